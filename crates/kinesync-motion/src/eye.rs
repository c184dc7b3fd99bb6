//! Eye frames - per-eye gaze rotation

use crate::{Lerp, Quat, Vec3};

/// Eye gaze state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyeFrame {
    pub left: Quat,
    pub right: Quat,
}

impl EyeFrame {
    pub fn new(left: Quat, right: Quat) -> Self {
        Self { left, right }
    }

    /// Both eyes looking straight ahead
    pub fn forward() -> Self {
        Self::default()
    }

    /// Both eyes rotated by the same yaw (Y) and pitch (X), in radians
    pub fn from_gaze(yaw: f32, pitch: f32) -> Self {
        let q = Quat::from_euler(yaw, pitch, 0.0);
        Self { left: q, right: q }
    }

    /// Forward (+Z) direction of each eye
    pub fn directions(&self) -> (Vec3, Vec3) {
        let forward = Vec3::new(0.0, 0.0, 1.0);
        (self.left.rotate(forward), self.right.rotate(forward))
    }
}

impl Lerp for EyeFrame {
    fn lerp(&self, other: &EyeFrame, t: f32) -> EyeFrame {
        EyeFrame {
            left: self.left.slerp(&other.left, t),
            right: self.right.slerp(&other.right, t),
        }
    }
}
