//! Camera head-bob
//!
//! A moving player starts a step; the step timer then advances until it
//! reaches the next multiple of `wavelength / frequency` and stops there,
//! even if the player has stopped moving. The camera height follows
//! `sin(timer * frequency)`, which is zero at every step boundary.

use crate::config::HeadBobConfig;

/// Slack added before locating the current step, so a timer parked exactly
/// on a boundary counts as having completed it
const STEP_EPSILON: f32 = 1e-6;

/// Head-bob oscillator state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadBob {
    timer: f32,
    active: bool,
}

impl HeadBob {
    /// Idle oscillator at phase zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated step time
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Whether a step is in progress
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance the oscillator and return the vertical camera offset
    ///
    /// `speed` is the player's current speed; `running` selects the faster
    /// step rate. Returns 0 while idle.
    pub fn update(&mut self, dt: f32, speed: f32, running: bool, config: &HeadBobConfig) -> f32 {
        if speed > config.activation_speed {
            self.active = true;
        }

        if !self.active {
            return 0.0;
        }

        let phase = (self.timer + STEP_EPSILON) * config.frequency / config.wavelength;
        let mut next_step = 1.0 + phase.floor();
        let mut next_step_time = config.step_time(next_step);
        // Far from the origin the epsilon vanishes in f32 rounding
        if next_step_time <= self.timer {
            next_step += 1.0;
            next_step_time = config.step_time(next_step);
        }

        let rate = if running { config.run_rate } else { config.walk_rate };
        self.timer = (self.timer + dt.max(0.0) * rate).min(next_step_time);

        if self.timer >= next_step_time {
            self.active = false;
            log::trace!("Head-bob step {} complete", next_step);
        }

        (self.timer * config.frequency).sin() * config.amplitude
    }

    /// Back to idle at phase zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_idle_below_activation_speed() {
        let config = HeadBobConfig::default();
        let mut bob = HeadBob::new();
        assert_eq!(bob.update(0.016, 0.05, false, &config), 0.0);
        assert!(!bob.is_active());
        assert_eq!(bob.timer(), 0.0);
    }

    #[test]
    fn test_step_stops_exactly_on_boundary() {
        let config = HeadBobConfig::default();
        let boundary = config.step_time(1.0);
        let mut bob = HeadBob::new();

        bob.update(0.013, 1.0, false, &config);
        assert!(bob.is_active());

        // Irregular frame times, player stops moving after the first one
        let mut previous = bob.timer();
        for dt in [0.05, 0.021, 0.1, 0.007, 0.2, 0.033, 0.3] {
            bob.update(dt, 0.0, false, &config);
            assert!(bob.timer() >= previous, "timer is monotonic");
            assert!(bob.timer() <= boundary);
            previous = bob.timer();
            if !bob.is_active() {
                break;
            }
        }

        assert!(!bob.is_active());
        assert_eq!(bob.timer(), boundary);

        // Idle afterwards: no further progress
        assert_eq!(bob.update(0.1, 0.0, false, &config), 0.0);
        assert_eq!(bob.timer(), boundary);
    }

    #[test]
    fn test_next_step_reaches_following_boundary() {
        let config = HeadBobConfig::default();
        let mut bob = HeadBob::new();

        for _ in 0..200 {
            bob.update(0.01, 1.0, true, &config);
        }
        let steps = bob.timer() / config.step_time(1.0);
        assert!(steps > 1.0, "several steps completed");

        // Stop moving and let the current step finish
        while bob.is_active() {
            bob.update(0.01, 0.0, true, &config);
        }
        let steps = bob.timer() / config.step_time(1.0);
        assert_abs_diff_eq!(steps, steps.round(), epsilon = 1e-4);
    }

    #[test]
    fn test_running_advances_twice_as_fast() {
        let config = HeadBobConfig::default();
        let mut walk = HeadBob::new();
        let mut run = HeadBob::new();
        walk.update(0.02, 1.0, false, &config);
        run.update(0.02, 1.0, true, &config);
        assert_abs_diff_eq!(walk.timer(), 0.015, epsilon = 1e-7);
        assert_abs_diff_eq!(run.timer(), 0.03, epsilon = 1e-7);
    }

    #[test]
    fn test_offset_follows_sine() {
        let config = HeadBobConfig::default();
        let mut bob = HeadBob::new();
        let offset = bob.update(0.1, 1.0, false, &config);
        assert_abs_diff_eq!(offset, (0.075_f32 * 10.0).sin() * 0.0005, epsilon = 1e-9);
        assert!(offset > 0.0);
    }

    #[test]
    fn test_progress_far_from_origin() {
        let config = HeadBobConfig::default();
        let start = config.step_time(5000.0);
        let mut bob = HeadBob { timer: start, active: false };
        bob.update(0.01, 1.0, false, &config);
        assert!(bob.timer() > start);
        assert!(bob.is_active());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let config = HeadBobConfig::default();
        let mut bob = HeadBob::new();
        bob.update(0.05, 2.0, true, &config);
        bob.reset();
        assert_eq!(bob, HeadBob::new());
    }
}
