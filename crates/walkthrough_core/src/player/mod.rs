//! First-person player simulation
//!
//! # Module Organization
//!
//! - [`input`] - Held actions and the host's view direction
//! - [`locomotion`] - Damping, gravity, input acceleration, jumping
//! - [`head_bob`] - Step-synchronized camera bob
//! - [`controller`] - Substep ordering and the frame loop

pub mod controller;
pub mod head_bob;
pub mod input;
pub mod locomotion;

pub use controller::{Player, Walkthrough, WalkthroughError};
pub use head_bob::HeadBob;
pub use input::{InputState, ViewDirection};
pub use locomotion::{clamp_frame_time, PlayerKinematics};
