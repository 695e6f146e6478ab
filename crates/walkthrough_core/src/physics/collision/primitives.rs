//! Primitive collision shapes and intersection algorithms
//!
//! Provides the ray and triangle primitives that world geometry is made of,
//! with the point and ray queries the narrow phase builds on.

use crate::foundation::math::{utils, Vec3, EPSILON};
use crate::spatial::AABB;

/// A ray for look-at queries
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray query against world geometry
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Index of the triangle that was hit, in build order
    pub triangle_index: usize,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point, facing the ray
    pub normal: Vec3,
}

/// A world-space triangle of static geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    ///
    /// Degenerate triangles produce a NaN normal; use [`Triangle::try_normal`]
    /// when the input is not known to be well formed.
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Unit normal, or `None` for zero-area triangles
    pub fn try_normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(EPSILON * EPSILON)
    }

    /// Whether the triangle has (numerically) zero area or non-finite vertices
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.v0, self.v1, self.v2].into_iter().all(utils::is_finite);
        !finite || self.try_normal().is_none()
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Tight bounding box of the three vertices
    pub fn bounds(&self) -> AABB {
        let min = utils::component_min(utils::component_min(self.v0, self.v1), self.v2);
        let max = utils::component_max(utils::component_max(self.v0, self.v1), self.v2);
        AABB::new(min, max)
    }

    /// The three edges as (start, end) vertex pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    /// Returns (t, u, v) barycentric coordinates if hit, None otherwise
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        const RAY_EPSILON: f32 = 0.000001;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a.abs() < RAY_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);

        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);

        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);

        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None // Behind ray origin
        }
    }

    /// Whether a point lying in the triangle plane is inside the triangle
    ///
    /// Uses barycentric coordinates with a small tolerance so points exactly
    /// on an edge count as inside. Degenerate triangles contain nothing.
    pub fn contains_point(&self, point: Vec3) -> bool {
        const BARYCENTRIC_TOLERANCE: f32 = 1e-5;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let to_point = point - self.v0;

        let dot11 = edge1.dot(&edge1);
        let dot12 = edge1.dot(&edge2);
        let dot22 = edge2.dot(&edge2);
        let dot1p = edge1.dot(&to_point);
        let dot2p = edge2.dot(&to_point);

        let denom = dot11 * dot22 - dot12 * dot12;
        if denom <= f32::EPSILON * dot11 * dot22 {
            return false;
        }

        let inv = 1.0 / denom;
        let u = (dot22 * dot1p - dot12 * dot2p) * inv;
        let v = (dot11 * dot2p - dot12 * dot1p) * inv;

        u >= -BARYCENTRIC_TOLERANCE
            && v >= -BARYCENTRIC_TOLERANCE
            && u + v <= 1.0 + BARYCENTRIC_TOLERANCE
    }
}

/// Build world triangles from indexed mesh buffers
///
/// Every three indices form one triangle. A trailing partial triangle is
/// ignored, and triangles referencing a vertex outside `vertices` are
/// skipped. Returns the triangles together with the number of skipped ones.
pub fn triangles_from_indexed(vertices: &[Vec3], indices: &[u32]) -> (Vec<Triangle>, usize) {
    let mut triangles = Vec::with_capacity(indices.len() / 3);
    let mut skipped = 0;

    for face in indices.chunks_exact(3) {
        let lookup = |i: u32| vertices.get(i as usize).copied();
        match (lookup(face[0]), lookup(face[1]), lookup(face[2])) {
            (Some(v0), Some(v1), Some(v2)) => triangles.push(Triangle::new(v0, v1, v2)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} triangles with out-of-range vertex indices", skipped);
    }

    (triangles, skipped)
}
