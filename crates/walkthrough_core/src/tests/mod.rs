//! End-to-end walkthrough scenarios
//!
//! These drive full frames through [`crate::Walkthrough`] or substeps through
//! [`crate::Player`] against small hand-built worlds.


use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;

/// Two triangles forming the rectangle `x0..x1` by `z0..z1` at height `y`, facing up
pub(crate) fn floor_rect(x0: f32, x1: f32, z0: f32, z1: f32, y: f32) -> Vec<Triangle> {
    vec![
        Triangle::new(Vec3::new(x0, y, z0), Vec3::new(x0, y, z1), Vec3::new(x1, y, z1)),
        Triangle::new(Vec3::new(x0, y, z0), Vec3::new(x1, y, z1), Vec3::new(x1, y, z0)),
    ]
}

/// Wall in the plane `x = x`, spanning `z0..z1` and `0..height`
pub(crate) fn wall_x(x: f32, z0: f32, z1: f32, height: f32) -> Vec<Triangle> {
    vec![
        Triangle::new(Vec3::new(x, 0.0, z0), Vec3::new(x, height, z1), Vec3::new(x, height, z0)),
        Triangle::new(Vec3::new(x, 0.0, z0), Vec3::new(x, 0.0, z1), Vec3::new(x, height, z1)),
    ]
}

/// Wall in the plane `z = z`, spanning `x0..x1` and `0..height`
pub(crate) fn wall_z(z: f32, x0: f32, x1: f32, height: f32) -> Vec<Triangle> {
    vec![
        Triangle::new(Vec3::new(x0, 0.0, z), Vec3::new(x1, 0.0, z), Vec3::new(x1, height, z)),
        Triangle::new(Vec3::new(x0, 0.0, z), Vec3::new(x1, height, z), Vec3::new(x0, height, z)),
    ]
}
