//! # Walkthrough Configuration
//!
//! Tunables for the player body, movement, head-bob, and collision world.
//! Defaults reproduce the gallery walkthrough feel: walk at 6 m/s, run at
//! 14 m/s, jump at 7.5 m/s under 30 m/s² of gravity.
//!
//! ## Configuration Categories
//!
//! - **Capsule**: spawn pose and radius of the player collider
//! - **Locomotion**: gravity, damping, speeds, frame substepping
//! - **Head-bob**: step rhythm and amplitude of the camera bob
//! - **Octree** / **Resolver**: collision world tuning

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::{constants, Vec3};
use crate::physics::collision::{Capsule, CapsuleError};
use crate::physics::ResolverConfig;
use crate::spatial::OctreeConfig;

/// Player collider at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Feet sphere center
    pub start: Vec3,
    /// Eye position
    pub end: Vec3,
    /// Body radius
    pub radius: f32,
}

impl CapsuleConfig {
    /// Build the spawn capsule
    pub fn to_capsule(&self) -> Result<Capsule, CapsuleError> {
        Capsule::new(self.start, self.end, self.radius)
    }

    /// Set the spawn position by its feet sphere center, keeping the height
    pub fn with_spawn(mut self, start: Vec3) -> Self {
        let height = self.end - self.start;
        self.start = start;
        self.end = start + height;
        self
    }
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 0.35, 0.0),
            end: Vec3::new(0.0, 1.0, 0.0),
            radius: 0.35,
        }
    }
}

/// Movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Downward acceleration while airborne (m/s²)
    pub gravity: f32,
    /// Exponential velocity decay rate (1/s)
    pub damping_rate: f32,
    /// Damping multiplier while airborne
    pub air_damping: f32,
    /// Ground acceleration when walking
    pub walk_speed: f32,
    /// Ground acceleration when running
    pub run_speed: f32,
    /// Acceleration while airborne
    pub air_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_speed: f32,
    /// Longest frame the simulation will advance in one update (s)
    pub max_frame_time: f32,
    /// Substeps per update
    pub substeps: u32,
}

impl LocomotionConfig {
    /// Check that every value is finite and in range
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("gravity", self.gravity),
            ("damping_rate", self.damping_rate),
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("air_speed", self.air_speed),
            ("jump_speed", self.jump_speed),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "locomotion.{name} must be finite and non-negative, got {value}"
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.air_damping) {
            return Err(format!(
                "locomotion.air_damping must be within [0, 1], got {}",
                self.air_damping
            ));
        }

        if !self.max_frame_time.is_finite() || self.max_frame_time <= 0.0 {
            return Err(format!(
                "locomotion.max_frame_time must be positive, got {}",
                self.max_frame_time
            ));
        }

        if self.substeps == 0 {
            return Err("locomotion.substeps must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            damping_rate: 4.0,
            air_damping: 0.1,
            walk_speed: 6.0,
            run_speed: 14.0,
            air_speed: 4.0,
            jump_speed: 7.5,
            max_frame_time: 0.05,
            substeps: 5,
        }
    }
}

/// Camera bob tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadBobConfig {
    /// Player speed above which a step starts
    pub activation_speed: f32,
    /// Phase length of one step
    pub wavelength: f32,
    /// Oscillation frequency
    pub frequency: f32,
    /// Timer rate while walking
    pub walk_rate: f32,
    /// Timer rate while running
    pub run_rate: f32,
    /// Peak vertical offset
    pub amplitude: f32,
}

impl HeadBobConfig {
    /// Check that every value is finite and in range
    pub fn validate(&self) -> Result<(), String> {
        if !(self.wavelength > 0.0 && self.wavelength.is_finite()) {
            return Err(format!("head_bob.wavelength must be positive, got {}", self.wavelength));
        }
        if !(self.frequency > 0.0 && self.frequency.is_finite()) {
            return Err(format!("head_bob.frequency must be positive, got {}", self.frequency));
        }

        let non_negative = [
            ("activation_speed", self.activation_speed),
            ("walk_rate", self.walk_rate),
            ("run_rate", self.run_rate),
            ("amplitude", self.amplitude),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("head_bob.{name} must be finite and non-negative, got {value}"));
            }
        }

        Ok(())
    }

    /// Timer value at which step `index` completes
    pub fn step_time(&self, index: f32) -> f32 {
        index * self.wavelength / self.frequency
    }
}

impl Default for HeadBobConfig {
    fn default() -> Self {
        Self {
            activation_speed: 0.1,
            wavelength: constants::PI,
            frequency: 10.0,
            walk_rate: 0.75,
            run_rate: 1.5,
            amplitude: 0.0005,
        }
    }
}

/// # Walkthrough Configuration
///
/// Top-level configuration bundling every subsystem. Loadable from TOML or
/// RON through [`Config`]; missing sections fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkthroughConfig {
    /// Player collider at spawn
    pub capsule: CapsuleConfig,
    /// Movement tuning
    pub locomotion: LocomotionConfig,
    /// Camera bob tuning
    pub head_bob: HeadBobConfig,
    /// Collision world subdivision
    pub octree: OctreeConfig,
    /// Collision response
    pub resolver: ResolverConfig,
}

impl WalkthroughConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spawn capsule
    pub fn with_capsule(mut self, capsule: CapsuleConfig) -> Self {
        self.capsule = capsule;
        self
    }

    /// Set the movement tuning
    pub fn with_locomotion(mut self, locomotion: LocomotionConfig) -> Self {
        self.locomotion = locomotion;
        self
    }

    /// Set the head-bob tuning
    pub fn with_head_bob(mut self, head_bob: HeadBobConfig) -> Self {
        self.head_bob = head_bob;
        self
    }

    /// Set the octree subdivision parameters
    pub fn with_octree(mut self, octree: OctreeConfig) -> Self {
        self.octree = octree;
        self
    }

    /// Set the resolver iteration count
    pub fn with_resolver_iterations(mut self, iterations: u32) -> Self {
        self.resolver.iterations = iterations;
        self
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capsule
            .to_capsule()
            .map_err(|e| ConfigError::Invalid(format!("capsule: {}", e)))?;
        self.locomotion.validate().map_err(ConfigError::Invalid)?;
        self.head_bob.validate().map_err(ConfigError::Invalid)?;

        if self.octree.max_triangles_per_leaf == 0 {
            return Err(ConfigError::Invalid(
                "octree.max_triangles_per_leaf must be at least 1".to_string(),
            ));
        }
        if !(self.octree.min_node_size >= 0.0 && self.octree.root_padding >= 0.0) {
            return Err(ConfigError::Invalid("octree sizes must be non-negative".to_string()));
        }
        if self.resolver.iterations == 0 {
            return Err(ConfigError::Invalid("resolver.iterations must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Load a configuration file and validate it
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config for WalkthroughConfig {}
