//! Axis-aligned bounding boxes
//!
//! Node bounds for the octree and the broad-phase volume of the capsule.

use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::Triangle;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p, p),
                Some(b) => {
                    Self::new(utils::component_min(b.min, p), utils::component_max(b.max, p))
                }
            })
        })
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Full edge lengths of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec3::new(margin, margin, margin);
        Self::new(self.min - m, self.max + m)
    }

    /// Cube sharing this box's center, with edge length equal to the
    /// longest side
    pub fn to_cube(&self) -> Self {
        let half = self.extents().max();
        Self::from_center_extents(self.center(), Vec3::new(half, half, half))
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Separating-axis test between this box and a triangle
    ///
    /// Tests the 13 candidate axes from Akenine-Möller: the three box
    /// normals, the triangle normal, and the nine box-axis × edge products.
    /// Touching counts as overlapping.
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        let center = self.center();
        let extents = self.extents();

        // Work relative to the box center so the box projects symmetrically
        let verts = [triangle.v0 - center, triangle.v1 - center, triangle.v2 - center];

        // Returns false if `axis` separates the shapes
        let overlaps_on = |axis: Vec3| -> bool {
            if axis.magnitude_squared() < 1e-12 {
                return true; // Degenerate axis, skip
            }
            let p0 = axis.dot(&verts[0]);
            let p1 = axis.dot(&verts[1]);
            let p2 = axis.dot(&verts[2]);
            let radius = extents.x * axis.x.abs()
                + extents.y * axis.y.abs()
                + extents.z * axis.z.abs();
            p0.min(p1).min(p2) <= radius && p0.max(p1).max(p2) >= -radius
        };

        let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];

        // Box face normals
        if !box_axes.iter().all(|&axis| overlaps_on(axis)) {
            return false;
        }

        let edges = [verts[1] - verts[0], verts[2] - verts[1], verts[0] - verts[2]];

        // Triangle face normal
        if !overlaps_on(edges[0].cross(&edges[1])) {
            return false;
        }

        // Edge cross products
        for axis in &box_axes {
            for edge in &edges {
                if !overlaps_on(axis.cross(edge)) {
                    return false;
                }
            }
        }

        true
    }

    /// Test ray intersection with this AABB using slab method
    /// Returns the distance to the entry point if the ray intersects, None otherwise
    /// Based on "An Efficient and Robust Ray–Box Intersection Algorithm"
    ///
    /// An axis the ray does not move along only constrains the origin, so a
    /// ray running along a face of the box still counts as inside it.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let (origin, dir) = (ray_origin[axis], ray_dir[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        if tmax >= tmin && tmax >= 0.0 {
            // Entry point distance (or 0 if we're inside the box)
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}
