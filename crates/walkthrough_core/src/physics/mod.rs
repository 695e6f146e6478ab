//! Physics module for collision detection and response
//!
//! Provides capsule collision against static triangles, using the octree
//! for the broad phase and the capsule/triangle test for the narrow phase,
//! plus the positional resolver that keeps the player out of the walls.

pub mod collision;
pub mod resolver;

pub use collision::{Capsule, CapsuleError, Contact, Ray, RayHit, Triangle};
pub use resolver::{resolve_collisions, ResolverConfig};
