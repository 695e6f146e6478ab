//! Velocity integration for the player
//!
//! Per substep the player's velocity is damped, pulled down by gravity while
//! airborne, pushed by the held movement keys, and kicked upward by a jump.
//! Position integration and collision response happen in the controller.

use crate::config::LocomotionConfig;
use crate::foundation::math::Vec3;
use crate::player::{InputState, ViewDirection};

/// Player motion state carried between substeps
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerKinematics {
    /// World-space velocity (m/s)
    pub velocity: Vec3,
    /// Whether the last collision pass found a floor-like contact
    pub on_floor: bool,
    /// Ground acceleration selected this substep (walk or run)
    pub speed: f32,
}

impl PlayerKinematics {
    /// Exponential damping, plus gravity and reduced damping while airborne
    pub fn apply_forces(&mut self, dt: f32, config: &LocomotionConfig) {
        let mut damping = (-config.damping_rate * dt).exp() - 1.0;

        if !self.on_floor {
            self.velocity.y -= config.gravity * dt;
            damping *= config.air_damping;
        }

        self.velocity += self.velocity * damping;
    }

    /// Accelerate along the horizontal view basis for each held direction key
    ///
    /// Airborne players get the reduced air speed. A view looking straight up
    /// or down has no horizontal basis and adds nothing.
    pub fn apply_input(
        &mut self,
        dt: f32,
        input: &InputState,
        view: &ViewDirection,
        config: &LocomotionConfig,
    ) {
        self.speed = if input.contains(InputState::RUN) {
            config.run_speed
        } else {
            config.walk_speed
        };

        let speed_delta = dt * if self.on_floor { self.speed } else { config.air_speed };

        let (Some(forward), Some(right)) = (view.forward(), view.right()) else {
            return;
        };

        let mut push = Vec3::zeros();
        if input.contains(InputState::FORWARD) {
            push += forward;
        }
        if input.contains(InputState::BACKWARD) {
            push -= forward;
        }
        if input.contains(InputState::STRAFE_LEFT) {
            push -= right;
        }
        if input.contains(InputState::STRAFE_RIGHT) {
            push += right;
        }

        self.velocity += push * speed_delta;
    }

    /// Set the jump velocity if jump is held while standing on a floor
    ///
    /// Returns whether the jump happened.
    pub fn apply_jump(&mut self, input: &InputState, config: &LocomotionConfig) -> bool {
        if self.on_floor && input.contains(InputState::JUMP) {
            self.velocity.y = config.jump_speed;
            true
        } else {
            false
        }
    }

    /// Horizontal speed, ignoring the vertical component
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).magnitude()
    }
}

/// Frame time the simulation will actually advance
///
/// NaN, infinite, and negative frame times become 0; long frames are
/// capped at `max_frame_time`.
pub fn clamp_frame_time(frame_dt: f32, max_frame_time: f32) -> f32 {
    if !frame_dt.is_finite() || frame_dt <= 0.0 {
        return 0.0;
    }
    if frame_dt > max_frame_time {
        log::debug!("Frame hitch of {:.3}s clamped to {:.3}s", frame_dt, max_frame_time);
        return max_frame_time;
    }
    frame_dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DT: f32 = 0.01;

    fn grounded() -> PlayerKinematics {
        PlayerKinematics {
            on_floor: true,
            ..PlayerKinematics::default()
        }
    }

    #[test]
    fn test_ground_damping_without_gravity() {
        let config = LocomotionConfig::default();
        let mut kin = grounded();
        kin.velocity = Vec3::new(2.0, 0.0, 0.0);
        kin.apply_forces(DT, &config);
        assert_relative_eq!(kin.velocity.x, 2.0 * (-4.0 * DT).exp(), epsilon = 1e-6);
        assert_eq!(kin.velocity.y, 0.0);
    }

    #[test]
    fn test_airborne_gravity_and_air_damping() {
        let config = LocomotionConfig::default();
        let mut kin = PlayerKinematics::default();
        kin.velocity = Vec3::new(1.0, 0.0, 0.0);
        kin.apply_forces(DT, &config);

        let damping = ((-4.0 * DT).exp() - 1.0) * 0.1;
        assert_relative_eq!(kin.velocity.y, -30.0 * DT * (1.0 + damping), epsilon = 1e-6);
        assert_relative_eq!(kin.velocity.x, 1.0 + damping, epsilon = 1e-6);
    }

    #[test]
    fn test_forward_input_follows_flattened_view() {
        let config = LocomotionConfig::default();
        let mut kin = grounded();
        // Looking down and to +X
        let view = ViewDirection::new(Vec3::new(1.0, -1.0, 0.0));
        kin.apply_input(DT, &InputState::FORWARD, &view, &config);
        assert_relative_eq!(kin.velocity, Vec3::new(6.0 * DT, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(kin.speed, 6.0);
    }

    #[test]
    fn test_run_and_strafe() {
        let config = LocomotionConfig::default();
        let mut kin = grounded();
        let view = ViewDirection::default();
        kin.apply_input(DT, &(InputState::STRAFE_RIGHT | InputState::RUN), &view, &config);
        assert_relative_eq!(kin.velocity, Vec3::new(14.0 * DT, 0.0, 0.0), epsilon = 1e-6);
        assert_eq!(kin.speed, 14.0);

        let mut kin = grounded();
        kin.apply_input(DT, &InputState::STRAFE_LEFT, &view, &config);
        assert_relative_eq!(kin.velocity, Vec3::new(-6.0 * DT, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_air_control_uses_air_speed() {
        let config = LocomotionConfig::default();
        let mut kin = PlayerKinematics::default();
        let input = InputState::BACKWARD | InputState::RUN;
        kin.apply_input(DT, &input, &ViewDirection::default(), &config);
        assert_relative_eq!(kin.velocity, Vec3::new(0.0, 0.0, 4.0 * DT), epsilon = 1e-6);
        assert_eq!(kin.speed, 14.0);
    }

    #[test]
    fn test_vertical_view_adds_nothing() {
        let config = LocomotionConfig::default();
        let mut kin = grounded();
        let view = ViewDirection::new(Vec3::new(0.0, 1.0, 0.0));
        kin.apply_input(DT, &InputState::all(), &view, &config);
        assert_eq!(kin.velocity, Vec3::zeros());
    }

    #[test]
    fn test_jump_only_from_floor() {
        let config = LocomotionConfig::default();

        let mut kin = grounded();
        assert!(kin.apply_jump(&InputState::JUMP, &config));
        assert_eq!(kin.velocity.y, 7.5);

        let mut airborne = PlayerKinematics::default();
        airborne.velocity.y = -2.0;
        assert!(!airborne.apply_jump(&InputState::JUMP, &config));
        assert_eq!(airborne.velocity.y, -2.0);
    }

    #[test]
    fn test_frame_time_clamp() {
        assert_eq!(clamp_frame_time(0.016, 0.05), 0.016);
        assert_eq!(clamp_frame_time(0.5, 0.05), 0.05);
        assert_eq!(clamp_frame_time(-0.1, 0.05), 0.0);
        assert_eq!(clamp_frame_time(f32::NAN, 0.05), 0.0);
        assert_eq!(clamp_frame_time(f32::INFINITY, 0.05), 0.0);
    }

    #[test]
    fn test_horizontal_speed_ignores_vertical() {
        let kin = PlayerKinematics {
            velocity: Vec3::new(3.0, -9.0, 4.0),
            ..PlayerKinematics::default()
        };
        assert_abs_diff_eq!(kin.horizontal_speed(), 5.0, epsilon = 1e-6);
    }
}
