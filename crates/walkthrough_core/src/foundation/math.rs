//! Math utilities and types
//!
//! Provides the fundamental vector types used by the collision and
//! locomotion code. Coordinates are Y-up, right-handed.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// World up axis
pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Tolerance below which a length is treated as zero
pub const EPSILON: f32 = 1e-6;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
}

/// Math utility functions
pub mod utils {
    use super::{Vec3, EPSILON, UP};

    /// Project a direction onto the horizontal plane and renormalize it
    ///
    /// Returns `None` when the direction is (nearly) vertical and has no
    /// usable horizontal component.
    pub fn flatten_horizontal(direction: Vec3) -> Option<Vec3> {
        Vec3::new(direction.x, 0.0, direction.z).try_normalize(EPSILON)
    }

    /// Horizontal right vector for a view direction (`forward × up`)
    pub fn horizontal_right(direction: Vec3) -> Option<Vec3> {
        flatten_horizontal(direction).map(|forward| forward.cross(&UP))
    }

    /// Component-wise minimum of two vectors
    pub fn component_min(a: Vec3, b: Vec3) -> Vec3 {
        Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
    }

    /// Component-wise maximum of two vectors
    pub fn component_max(a: Vec3, b: Vec3) -> Vec3 {
        Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
    }

    /// Whether every component of the vector is finite
    pub fn is_finite(v: Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}
