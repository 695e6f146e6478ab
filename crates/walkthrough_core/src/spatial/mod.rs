//! Spatial partitioning for static world geometry
//!
//! - [`AABB`] - Node bounds and broad-phase volumes
//! - [`Octree`] - Triangle index answering capsule and ray queries

pub mod aabb;
pub mod octree;

pub use aabb::AABB;
pub use octree::{Octree, OctreeConfig, OctreeNode};
