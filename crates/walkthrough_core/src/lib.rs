//! # Walkthrough Core
//!
//! First-person walkthrough physics for static triangle worlds: a capsule
//! player that walks, runs, and jumps through indexed geometry without
//! passing through walls or floors.
//!
//! ## Features
//!
//! - **Octree**: static triangle partitioning with capsule and ray queries
//! - **Capsule Collision**: face and edge contacts with depth and normal
//! - **Locomotion**: damped velocity, gravity, air control, fixed substeps
//! - **Head-Bob**: step-synchronized camera oscillation
//! - **Configuration**: TOML/RON tuning files with validated defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use walkthrough_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (a, b, c, d) = (
//!         Vec3::new(-5.0, 0.0, -5.0),
//!         Vec3::new(-5.0, 0.0, 5.0),
//!         Vec3::new(5.0, 0.0, 5.0),
//!         Vec3::new(5.0, 0.0, -5.0),
//!     );
//!     let floor = vec![Triangle::new(a, b, c), Triangle::new(a, c, d)];
//!     let mut walk = Walkthrough::new(floor, WalkthroughConfig::default())?;
//!
//!     let input = InputState::from_key_codes(["KeyW", "ShiftLeft"]);
//!     let camera = walk.update(1.0 / 60.0, &input, &ViewDirection::default());
//!     println!("camera at {camera:?}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod foundation;
pub mod physics;
pub mod player;
pub mod spatial;

#[cfg(test)]
mod tests;

pub use player::{Player, Walkthrough, WalkthroughError};

/// Common imports for walkthrough users
pub mod prelude {
    pub use crate::{
        config::{
            CapsuleConfig, Config, ConfigError, HeadBobConfig, LocomotionConfig, WalkthroughConfig,
        },
        foundation::math::Vec3,
        physics::{
            collision::{
                triangles_from_indexed, Capsule, CapsuleError, Contact, Ray, RayHit, Triangle,
            },
            ResolverConfig,
        },
        player::{InputState, Player, ViewDirection, Walkthrough, WalkthroughError},
        spatial::{Octree, OctreeConfig, AABB},
    };
}
