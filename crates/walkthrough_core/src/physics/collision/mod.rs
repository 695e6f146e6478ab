//! Collision geometry and narrow-phase tests
//!
//! # Module Organization
//!
//! - [`primitives`] - World geometry primitives (rays, triangles)
//! - [`capsule`] - The player's swept-sphere collider
//! - [`narrow_phase`] - Capsule/triangle penetration test
//!
//! # Key Types
//!
//! - [`Triangle`] - Static world triangle, immutable once indexed
//! - [`Capsule`] - Segment plus radius, moved by the integrator and resolver
//! - [`Contact`] - Push-out normal and depth produced by a query

pub mod capsule;
pub mod narrow_phase;
pub mod primitives;

// Re-export commonly used types
pub use capsule::{Capsule, CapsuleError};
pub use narrow_phase::{capsule_triangle, Contact, CONTACT_SLOP};
pub use primitives::{triangles_from_indexed, Ray, RayHit, Triangle};
