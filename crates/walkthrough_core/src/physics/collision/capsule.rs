//! Capsule collider for the player body
//!
//! A capsule is a line segment swept by a radius. The player stands along
//! the segment with `start` at the feet sphere center and `end` at the eye.

use crate::foundation::math::{utils, Vec3};
use crate::spatial::AABB;
use thiserror::Error;

/// Capsule construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapsuleError {
    /// Radius must be strictly positive
    #[error("Capsule radius must be positive, got {0}")]
    InvalidRadius(f32),

    /// The two endpoints coincide
    #[error("Capsule segment is degenerate: start and end are both {0:?}")]
    DegenerateSegment([f32; 3]),

    /// An endpoint or the radius is NaN or infinite
    #[error("Capsule parameters must be finite")]
    NonFinite,
}

/// Swept-sphere collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    start: Vec3,
    end: Vec3,
    radius: f32,
}

impl Capsule {
    /// Create a capsule, rejecting shapes that cannot produce sane contacts
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Result<Self, CapsuleError> {
        if !utils::is_finite(start) || !utils::is_finite(end) || !radius.is_finite() {
            return Err(CapsuleError::NonFinite);
        }
        if radius <= 0.0 {
            return Err(CapsuleError::InvalidRadius(radius));
        }
        if start == end {
            return Err(CapsuleError::DegenerateSegment([start.x, start.y, start.z]));
        }
        Ok(Self { start, end, radius })
    }

    /// Lower segment endpoint
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Upper segment endpoint (eye position)
    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Sweep radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Midpoint of the segment
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Shift both endpoints by the same offset
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Raise or lower the upper endpoint only
    pub fn offset_end_y(&mut self, dy: f32) {
        self.end.y += dy;
    }

    /// Box enclosing the whole swept volume
    pub fn bounding_box(&self) -> AABB {
        AABB::new(
            utils::component_min(self.start, self.end),
            utils::component_max(self.start, self.end),
        )
        .expanded(self.radius)
    }

    /// Closest point on the segment to `point`
    pub fn closest_point_to(&self, point: Vec3) -> Vec3 {
        let axis = self.end - self.start;
        let len_sq = axis.magnitude_squared();
        if len_sq <= f32::EPSILON {
            return self.start;
        }
        let t = ((point - self.start).dot(&axis) / len_sq).clamp(0.0, 1.0);
        self.start + axis * t
    }
}
