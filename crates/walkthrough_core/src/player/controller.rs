//! First-person walkthrough controller
//!
//! [`Player`] owns everything that changes per substep: the capsule, its
//! kinematics, and the head-bob. [`Walkthrough`] pairs a player with the
//! immutable collision world and runs the fixed-substep frame loop.

use thiserror::Error;

use crate::config::{CapsuleConfig, ConfigError, WalkthroughConfig};
use crate::foundation::math::{Vec3, EPSILON};
use crate::physics::collision::{Capsule, CapsuleError, Ray, RayHit, Triangle};
use crate::physics::resolve_collisions;
use crate::player::locomotion::clamp_frame_time;
use crate::player::{HeadBob, InputState, PlayerKinematics, ViewDirection};
use crate::spatial::Octree;

/// Errors raised while setting up a walkthrough
#[derive(Error, Debug)]
pub enum WalkthroughError {
    /// The spawn capsule is unusable
    #[error("Invalid player capsule: {0}")]
    Capsule(#[from] CapsuleError),

    /// The configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The player body and its motion state
#[derive(Debug, Clone)]
pub struct Player {
    capsule: Capsule,
    kinematics: PlayerKinematics,
    head_bob: HeadBob,
    camera_position: Vec3,
}

impl Player {
    /// Spawn a player at rest, airborne until the first collision pass
    pub fn new(spawn: &CapsuleConfig) -> Result<Self, CapsuleError> {
        let capsule = spawn.to_capsule()?;
        Ok(Self {
            capsule,
            kinematics: PlayerKinematics::default(),
            head_bob: HeadBob::new(),
            camera_position: capsule.end(),
        })
    }

    /// Return to the spawn pose with zero velocity and an idle head-bob
    pub fn reset(&mut self, spawn: &CapsuleConfig) -> Result<(), CapsuleError> {
        *self = Self::new(spawn)?;
        Ok(())
    }

    /// Advance the player by one substep
    ///
    /// Order: forces, input, jump, move, collide, head-bob, publish camera.
    pub fn step(
        &mut self,
        dt: f32,
        input: &InputState,
        view: &ViewDirection,
        world: &Octree,
        config: &WalkthroughConfig,
    ) {
        let locomotion = &config.locomotion;

        self.kinematics.apply_forces(dt, locomotion);
        self.kinematics.apply_input(dt, input, view, locomotion);
        self.kinematics.apply_jump(input, locomotion);

        self.capsule.translate(self.kinematics.velocity * dt);
        resolve_collisions(&mut self.capsule, &mut self.kinematics, world, &config.resolver);

        let bob = self.head_bob.update(
            dt,
            self.kinematics.velocity.magnitude(),
            input.contains(InputState::RUN),
            &config.head_bob,
        );
        self.capsule.offset_end_y(bob);

        self.camera_position = self.capsule.end();
    }

    /// Current collider
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// Velocity and floor contact state
    pub fn kinematics(&self) -> &PlayerKinematics {
        &self.kinematics
    }

    /// Head-bob oscillator
    pub fn head_bob(&self) -> &HeadBob {
        &self.head_bob
    }

    /// Camera position published by the last substep
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Whether the player is standing on a floor
    pub fn on_floor(&self) -> bool {
        self.kinematics.on_floor
    }

    /// Current velocity
    pub fn velocity(&self) -> Vec3 {
        self.kinematics.velocity
    }
}

/// A player walking through a static triangle world
#[derive(Debug, Clone)]
pub struct Walkthrough {
    octree: Octree,
    player: Player,
    config: WalkthroughConfig,
}

impl Walkthrough {
    /// Build the collision world and spawn the player
    pub fn new(
        triangles: Vec<Triangle>,
        config: WalkthroughConfig,
    ) -> Result<Self, WalkthroughError> {
        let player = Player::new(&config.capsule)?;
        config.validate()?;

        let octree = Octree::build(triangles, &config.octree);
        log::info!("Walkthrough ready, player spawned at {:?}", player.capsule().start());

        Ok(Self { octree, player, config })
    }

    /// Advance one rendered frame and return the camera position
    ///
    /// The frame time is clamped to `max_frame_time` and split evenly over
    /// `substeps` fixed substeps.
    pub fn update(&mut self, frame_dt: f32, input: &InputState, view: &ViewDirection) -> Vec3 {
        let locomotion = &self.config.locomotion;
        let substeps = locomotion.substeps.max(1);
        let dt = clamp_frame_time(frame_dt, locomotion.max_frame_time) / substeps as f32;

        for _ in 0..substeps {
            self.player.step(dt, input, view, &self.octree, &self.config);
        }

        self.player.camera_position()
    }

    /// First surface hit looking from the camera along `view`
    pub fn look_at(&self, view: &ViewDirection, max_distance: f32) -> Option<RayHit> {
        let direction = view.direction().try_normalize(EPSILON)?;
        let ray = Ray::new(self.player.camera_position(), direction);
        self.octree.raycast(&ray, max_distance)
    }

    /// Put the player back at the spawn pose
    pub fn respawn(&mut self) -> Result<(), WalkthroughError> {
        self.player.reset(&self.config.capsule)?;
        log::debug!("Player respawned at {:?}", self.player.capsule().start());
        Ok(())
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The collision world
    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    /// Active configuration
    pub fn config(&self) -> &WalkthroughConfig {
        &self.config
    }

    /// Camera position published by the last update
    pub fn camera_position(&self) -> Vec3 {
        self.player.camera_position()
    }
}
