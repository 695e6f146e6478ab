//! Octree spatial partitioning over static triangles
//!
//! Divides the world into hierarchical cubes so capsule and ray queries only
//! visit triangles near the query volume. Built once from the full triangle
//! set and read-only afterwards. A node splits into 8 octants when it holds
//! too many triangles; triangles straddling a split plane are stored in every
//! octant they overlap.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::physics::collision::{
    capsule_triangle, Capsule, Contact, Ray, RayHit, Triangle, CONTACT_SLOP,
};
use crate::spatial::AABB;

/// Configuration for octree subdivision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum triangles per leaf before subdivision
    pub max_triangles_per_leaf: usize,

    /// Maximum subdivision depth (root is 0)
    pub max_depth: u32,

    /// Nodes with an edge at or below this length never split
    pub min_node_size: f32,

    /// Margin added around the geometry before squaring the root box
    pub root_padding: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_leaf: 8,
            max_depth: 16,
            min_node_size: 0.1,
            root_padding: 0.01,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Indices into the octree's triangle store (leaves only)
    pub triangles: Vec<usize>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Bounds of one octant
    ///
    /// Octant layout: bit 0 selects +X, bit 1 selects +Y, bit 2 selects +Z.
    /// Children share the parent's split planes exactly so they tile it
    /// without gaps.
    fn octant_bounds(&self, octant: usize) -> AABB {
        let (min, max) = (self.bounds.min, self.bounds.max);
        let c = self.bounds.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if octant & bit != 0 { (mid, hi) } else { (lo, mid) }
        };
        let (x0, x1) = pick(1, min.x, c.x, max.x);
        let (y0, y1) = pick(2, min.y, c.y, max.y);
        let (z0, z1) = pick(4, min.z, c.z, max.z);
        AABB::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }

    fn octant_of(&self, point: Vec3) -> usize {
        let c = self.bounds.center();
        usize::from(point.x >= c.x)
            | (usize::from(point.y >= c.y) << 1)
            | (usize::from(point.z >= c.z) << 2)
    }

    /// Recursively split this node while it is over capacity
    fn subdivide(&mut self, store: &[Triangle], config: &OctreeConfig) {
        let should_subdivide = self.triangles.len() > config.max_triangles_per_leaf
            && self.depth < config.max_depth
            && self.bounds.size().x > config.min_node_size;

        if !should_subdivide {
            return;
        }

        let mut children: [OctreeNode; 8] = std::array::from_fn(|octant| {
            OctreeNode::new(self.octant_bounds(octant), self.depth + 1)
        });

        for index in std::mem::take(&mut self.triangles) {
            let triangle = &store[index];
            let mut placed = false;
            for child in children.iter_mut() {
                if child.bounds.intersects_triangle(triangle) {
                    child.triangles.push(index);
                    placed = true;
                }
            }
            // Rounding can reject a triangle lying on a split plane
            if !placed {
                children[self.octant_of(triangle.centroid())].triangles.push(index);
            }
        }

        for child in children.iter_mut() {
            child.subdivide(store, config);
        }

        self.children = Some(Box::new(children));
    }

    /// Collect triangle indices from non-empty leaves overlapping `query`
    fn collect_overlapping(&self, query: &AABB, results: &mut Vec<usize>) {
        if !self.bounds.intersects(query) {
            return;
        }

        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.collect_overlapping(query, results);
                }
            }
            None => results.extend_from_slice(&self.triangles),
        }
    }

    /// Nearest ray hit in this subtree closer than `best`
    fn raycast(&self, ray: &Ray, store: &[Triangle], best: &mut Option<RayHit>, max_distance: f32) {
        let Some(entry) = self.bounds.intersect_ray(ray.origin, ray.direction) else {
            return;
        };
        let limit = best.map_or(max_distance, |hit| hit.distance);
        if entry > limit {
            return;
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.raycast(ray, store, best, max_distance);
            }
            return;
        }

        for &index in &self.triangles {
            let triangle = &store[index];
            let Some((t, _, _)) = triangle.intersect_ray(ray) else {
                continue;
            };
            let closer = match best {
                Some(hit) => t < hit.distance || (t == hit.distance && index < hit.triangle_index),
                None => t <= max_distance,
            };
            if !closer {
                continue;
            }
            let Some(normal) = triangle.try_normal() else {
                continue;
            };
            let normal = if normal.dot(&ray.direction) > 0.0 { -normal } else { normal };
            *best = Some(RayHit {
                triangle_index: index,
                distance: t,
                point: ray.point_at(t),
                normal,
            });
        }
    }

    /// Get all leaf nodes
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.get_all_leaves(leaves);
            }
        } else {
            leaves.push(self);
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(OctreeNode::count_nodes).sum())
    }

    /// Deepest level below (and including) this node
    pub fn max_depth(&self) -> u32 {
        self.children.as_ref().map_or(self.depth, |children| {
            children.iter().map(OctreeNode::max_depth).max().unwrap_or(self.depth)
        })
    }
}

/// Octree over a static triangle set
#[derive(Debug, Clone)]
pub struct Octree {
    /// Triangle store, in build order
    triangles: Vec<Triangle>,

    /// Root node containing every indexed triangle
    root: OctreeNode,

    /// Number of triangles left out of the tree because they have no area
    degenerate: usize,
}

impl Octree {
    /// Build an octree from the full static triangle set
    ///
    /// Degenerate triangles keep their slot in the store, so indices still
    /// match the input, but are never indexed by a node.
    pub fn build(triangles: Vec<Triangle>, config: &OctreeConfig) -> Self {
        let usable: Vec<usize> =
            (0..triangles.len()).filter(|&i| !triangles[i].is_degenerate()).collect();
        let degenerate = triangles.len() - usable.len();
        if degenerate > 0 {
            log::warn!("Octree skipping {} degenerate triangles", degenerate);
        }

        let bounds = AABB::from_points(usable.iter().flat_map(|&i| {
            let t = &triangles[i];
            [t.v0, t.v1, t.v2]
        }))
        .map_or(AABB::new(Vec3::zeros(), Vec3::zeros()), |b| {
            b.expanded(config.root_padding).to_cube()
        });

        let mut root = OctreeNode::new(bounds, 0);
        root.triangles = usable;
        root.subdivide(&triangles, config);

        let octree = Self { triangles, root, degenerate };
        log::info!(
            "Built octree: {} triangles, {} nodes, {} leaves, depth {}",
            octree.triangle_count(),
            octree.node_count(),
            octree.leaf_count(),
            octree.max_depth_reached()
        );
        octree
    }

    /// Deepest contact between the capsule and any triangle, if any
    ///
    /// Ties keep the lowest triangle index.
    pub fn query_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        self.capsule_triangles(capsule)
            .into_iter()
            .filter_map(|index| capsule_triangle(capsule, &self.triangles[index]))
            .fold(None, |best: Option<Contact>, contact| match best {
                Some(b) if b.depth >= contact.depth => Some(b),
                _ => Some(contact),
            })
    }

    /// Broad-phase candidates for a capsule, sorted and deduplicated
    pub fn capsule_triangles(&self, capsule: &Capsule) -> Vec<usize> {
        let query = capsule.bounding_box().expanded(CONTACT_SLOP);
        let mut results = Vec::new();
        self.root.collect_overlapping(&query, &mut results);
        results.sort_unstable();
        results.dedup();
        results
    }

    /// Nearest triangle hit along the ray within `max_distance`
    ///
    /// The returned normal faces back toward the ray origin.
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best = None;
        self.root.raycast(ray, &self.triangles, &mut best, max_distance);
        best
    }

    /// Number of triangles in the store, degenerate ones included
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of triangles excluded for having no area
    pub fn degenerate_count(&self) -> usize {
        self.degenerate
    }

    /// The triangle store, in build order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Root bounds
    pub fn bounds(&self) -> AABB {
        self.root.bounds
    }

    /// Root node
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    /// All leaf nodes, empty ones included
    pub fn leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Number of leaf nodes
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Depth of the deepest node
    pub fn max_depth_reached(&self) -> u32 {
        self.root.max_depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Flat y = 0 grid of `n * n` quads, each `cell` wide, centered on the origin
    fn floor_grid(n: usize, cell: f32) -> Vec<Triangle> {
        let half = n as f32 * cell * 0.5;
        let mut tris = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let x0 = i as f32 * cell - half;
                let z0 = j as f32 * cell - half;
                let (x1, z1) = (x0 + cell, z0 + cell);
                tris.push(Triangle::new(
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x0, 0.0, z1),
                    Vec3::new(x1, 0.0, z1),
                ));
                tris.push(Triangle::new(
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x1, 0.0, z1),
                    Vec3::new(x1, 0.0, z0),
                ));
            }
        }
        tris
    }

    fn capsule_at(x: f32, y: f32, z: f32) -> Capsule {
        Capsule::new(Vec3::new(x, y, z), Vec3::new(x, y + 0.65, z), 0.35).unwrap()
    }

    fn walk<'a>(node: &'a OctreeNode, visit: &mut impl FnMut(&'a OctreeNode)) {
        visit(node);
        if let Some(children) = &node.children {
            for child in children.iter() {
                walk(child, visit);
            }
        }
    }

    #[test]
    fn test_empty_octree() {
        let octree = Octree::build(Vec::new(), &OctreeConfig::default());
        assert_eq!(octree.triangle_count(), 0);
        assert_eq!(octree.leaf_count(), 1);
        assert!(octree.query_capsule(&capsule_at(0.0, 0.0, 0.0)).is_none());
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(octree.raycast(&ray, 100.0).is_none());
    }

    #[test]
    fn test_root_is_padded_cube() {
        let octree = Octree::build(floor_grid(4, 1.0), &OctreeConfig::default());
        let size = octree.bounds().size();
        assert_abs_diff_eq!(size.x, 4.02, epsilon = 1e-5);
        assert_abs_diff_eq!(size.y, size.x, epsilon = 1e-6);
        assert_abs_diff_eq!(size.z, size.x, epsilon = 1e-6);
        assert_abs_diff_eq!(octree.bounds().center().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_small_set_stays_single_leaf() {
        let octree = Octree::build(floor_grid(2, 1.0), &OctreeConfig::default());
        assert_eq!(octree.node_count(), 1);
        assert!(octree.root().is_leaf());
        assert_eq!(octree.root().triangles.len(), 8);
    }

    #[test]
    fn test_subdivision_invariants() {
        let tris = floor_grid(16, 1.0);
        let count = tris.len();
        let config = OctreeConfig::default();
        let octree = Octree::build(tris, &config);

        assert!(!octree.root().is_leaf());
        assert!(octree.max_depth_reached() <= config.max_depth);

        let mut reachable = vec![false; count];
        walk(octree.root(), &mut |node| {
            if let Some(children) = &node.children {
                assert!(node.triangles.is_empty(), "interior nodes hold no triangles");
                for child in children.iter() {
                    assert!(node.bounds.contains_point(child.bounds.min));
                    assert!(node.bounds.contains_point(child.bounds.max));
                    assert_eq!(child.depth, node.depth + 1);
                }
            }
            for &i in &node.triangles {
                assert!(node.bounds.intersects_triangle(&octree.triangles()[i]));
                reachable[i] = true;
            }
        });
        assert!(reachable.iter().all(|&r| r), "every triangle is stored in some leaf");
    }

    #[test]
    fn test_depth_limit_respected() {
        let config = OctreeConfig {
            max_depth: 2,
            ..OctreeConfig::default()
        };
        let octree = Octree::build(floor_grid(32, 0.5), &config);
        assert_eq!(octree.max_depth_reached(), 2);
    }

    #[test]
    fn test_min_node_size_stops_split() {
        // Many overlapping slivers in a tiny region
        let tris: Vec<Triangle> = (0..20)
            .map(|i| {
                let y = i as f32 * 0.001;
                Triangle::new(
                    Vec3::new(0.0, y, 0.0),
                    Vec3::new(0.05, y, 0.0),
                    Vec3::new(0.0, y, 0.05),
                )
            })
            .collect();
        let octree = Octree::build(tris, &OctreeConfig::default());
        assert_eq!(octree.node_count(), 1);
    }

    #[test]
    fn test_degenerate_triangles_not_indexed() {
        let mut tris = floor_grid(2, 1.0);
        tris.push(Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)));
        let octree = Octree::build(tris, &OctreeConfig::default());
        assert_eq!(octree.triangle_count(), 9);
        assert_eq!(octree.degenerate_count(), 1);
        assert!(octree.leaves().iter().all(|leaf| !leaf.triangles.contains(&8)));
    }

    #[test]
    fn test_capsule_candidates_are_local() {
        let octree = Octree::build(floor_grid(16, 1.0), &OctreeConfig::default());
        let candidates = octree.capsule_triangles(&capsule_at(0.5, 0.35, 0.5));
        assert!(!candidates.is_empty());
        assert!(candidates.len() < octree.triangle_count() / 4);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));

        let far = octree.capsule_triangles(&capsule_at(0.5, 5.0, 0.5));
        assert!(far.is_empty());
    }

    #[test]
    fn test_query_matches_brute_force() {
        let mut tris = floor_grid(16, 1.0);
        // Raised step and a wall for variety
        tris.push(Triangle::new(
            Vec3::new(-1.0, 0.1, -1.0),
            Vec3::new(-1.0, 0.1, 1.0),
            Vec3::new(1.0, 0.1, 1.0),
        ));
        tris.push(Triangle::new(
            Vec3::new(2.0, 0.0, -3.0),
            Vec3::new(2.0, 3.0, 3.0),
            Vec3::new(2.0, 3.0, -3.0),
        ));
        let octree = Octree::build(tris.clone(), &OctreeConfig::default());

        let spots = [
            (0.0, 0.3, 0.0),
            (-0.5, 0.2, 0.5),
            (1.8, 1.0, 0.0),
            (3.5, 0.1, -2.5),
            (0.0, 4.0, 0.0),
        ];
        for (x, y, z) in spots {
            let capsule = capsule_at(x, y, z);
            let brute = tris
                .iter()
                .filter_map(|t| capsule_triangle(&capsule, t))
                .map(|c| c.depth)
                .reduce(f32::max);
            let fast = octree.query_capsule(&capsule).map(|c| c.depth);
            match (brute, fast) {
                (Some(b), Some(f)) => assert_abs_diff_eq!(b, f, epsilon = 1e-6),
                (None, None) => {}
                other => panic!("mismatch at ({x}, {y}, {z}): {other:?}"),
            }
        }
    }

    #[test]
    fn test_query_keeps_deepest_contact() {
        let mut tris = floor_grid(4, 1.0);
        tris.push(Triangle::new(
            Vec3::new(-1.0, 0.1, -1.0),
            Vec3::new(-1.0, 0.1, 1.0),
            Vec3::new(1.0, 0.1, 1.0),
        ));
        tris.push(Triangle::new(
            Vec3::new(-1.0, 0.1, -1.0),
            Vec3::new(1.0, 0.1, 1.0),
            Vec3::new(1.0, 0.1, -1.0),
        ));
        let octree = Octree::build(tris, &OctreeConfig::default());

        let contact = octree.query_capsule(&capsule_at(0.2, 0.3, 0.1)).unwrap();
        assert_abs_diff_eq!(contact.depth, 0.15, epsilon = 1e-5);
        assert!(contact.is_floor());
    }

    #[test]
    fn test_raycast_returns_nearest_hit() {
        let near = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(1.0, -1.0, -2.0),
            Vec3::new(0.0, 1.0, -2.0),
        );
        let far = Triangle::new(
            Vec3::new(-1.0, -1.0, -5.0),
            Vec3::new(1.0, -1.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        );
        let mut tris = floor_grid(8, 1.0);
        tris.push(far);
        tris.push(near);
        let near_index = tris.len() - 1;
        let octree = Octree::build(tris, &OctreeConfig::default());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = octree.raycast(&ray, 100.0).unwrap();
        assert_eq!(hit.triangle_index, near_index);
        assert_abs_diff_eq!(hit.distance, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.point.z, -2.0, epsilon = 1e-5);
        assert!(hit.normal.dot(&ray.direction) < 0.0);

        assert!(octree.raycast(&ray, 1.5).is_none());
    }

    #[test]
    fn test_raycast_hits_floor_from_above() {
        let octree = Octree::build(floor_grid(16, 1.0), &OctreeConfig::default());
        let ray = Ray::new(Vec3::new(2.3, 1.7, -4.1), Vec3::new(0.0, -1.0, 0.0));
        let hit = octree.raycast(&ray, 10.0).unwrap();
        assert_abs_diff_eq!(hit.distance, 1.7, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.normal.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_raycast_from_split_plane() {
        // Wall quad centered on the root, so the root splits at y = 0
        let (a, b, c, d) = (
            Vec3::new(-2.0, -2.0, -3.0),
            Vec3::new(2.0, -2.0, -3.0),
            Vec3::new(2.0, 2.0, -3.0),
            Vec3::new(-2.0, 2.0, -3.0),
        );
        let config = OctreeConfig {
            max_triangles_per_leaf: 1,
            max_depth: 3,
            ..OctreeConfig::default()
        };
        let octree = Octree::build(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)], &config);
        assert!(octree.node_count() > 1);
        assert_abs_diff_eq!(octree.bounds().center().y, 0.0, epsilon = 1e-6);

        // Level ray running exactly along the y = 0 split plane
        let ray = Ray::new(Vec3::new(0.3, 0.0, 0.3), Vec3::new(0.0, 0.0, -1.0));
        let hit = octree.raycast(&ray, 10.0).unwrap();
        assert_abs_diff_eq!(hit.distance, 3.3, epsilon = 1e-5);
        assert!(hit.normal.z > 0.9);
    }
}
