//! Player input snapshot
//!
//! The host samples its keyboard once per frame and hands the walkthrough a
//! set of held actions plus the direction the camera is looking.

use bitflags::bitflags;

use crate::foundation::math::{utils, Vec3};

bitflags! {
    /// Movement actions held this frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputState: u8 {
        /// Move along the view direction
        const FORWARD = 1 << 0;
        /// Move against the view direction
        const BACKWARD = 1 << 1;
        /// Move to the left of the view direction
        const STRAFE_LEFT = 1 << 2;
        /// Move to the right of the view direction
        const STRAFE_RIGHT = 1 << 3;
        /// Use run speed instead of walk speed
        const RUN = 1 << 4;
        /// Jump when standing on a floor
        const JUMP = 1 << 5;
    }
}

impl InputState {
    /// Action bound to a DOM-style key code (`KeyW`, `ShiftLeft`, ...)
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(Self::FORWARD),
            "KeyS" => Some(Self::BACKWARD),
            "KeyA" => Some(Self::STRAFE_LEFT),
            "KeyD" => Some(Self::STRAFE_RIGHT),
            "ShiftLeft" => Some(Self::RUN),
            "Space" => Some(Self::JUMP),
            _ => None,
        }
    }

    /// Actions for every held key; unbound keys are ignored
    pub fn from_key_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        codes
            .into_iter()
            .filter_map(Self::from_key_code)
            .fold(Self::empty(), |acc, action| acc | action)
    }

    /// Whether any horizontal movement key is held
    pub fn is_moving(self) -> bool {
        self.intersects(Self::FORWARD | Self::BACKWARD | Self::STRAFE_LEFT | Self::STRAFE_RIGHT)
    }
}

/// Direction the camera is looking, owned by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDirection(pub Vec3);

impl ViewDirection {
    /// Wrap a look vector; it need not be normalized
    pub fn new(direction: Vec3) -> Self {
        Self(direction)
    }

    /// Look vector from yaw (around +Y, 0 = looking down -Z) and pitch, in radians
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        Self(Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch))
    }

    /// Raw look vector
    pub fn direction(&self) -> Vec3 {
        self.0
    }

    /// Horizontal forward vector, `None` when looking straight up or down
    pub fn forward(&self) -> Option<Vec3> {
        utils::flatten_horizontal(self.0)
    }

    /// Horizontal right vector, `None` when looking straight up or down
    pub fn right(&self) -> Option<Vec3> {
        utils::horizontal_right(self.0)
    }
}

impl Default for ViewDirection {
    fn default() -> Self {
        Self(Vec3::new(0.0, 0.0, -1.0))
    }
}
