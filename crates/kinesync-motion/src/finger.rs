//! Finger frames - per-joint finger rotations for both hands

use crate::{Lerp, Quat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

/// Joint along a finger, from the palm outward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phalanx {
    Proximal,
    Intermediate,
    Distal,
}

/// One finger joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerBone {
    pub hand: Hand,
    pub finger: Finger,
    pub phalanx: Phalanx,
}

pub const FINGERS_PER_HAND: usize = 5;
pub const PHALANGES_PER_FINGER: usize = 3;
/// Number of finger joints carried by a [`FingerFrame`]
pub const FINGER_BONE_COUNT: usize = 2 * FINGERS_PER_HAND * PHALANGES_PER_FINGER;

impl FingerBone {
    pub fn new(hand: Hand, finger: Finger, phalanx: Phalanx) -> Self {
        Self {
            hand,
            finger,
            phalanx,
        }
    }

    /// Slot index: hand-major, then finger, then phalanx
    #[inline]
    pub fn index(self) -> usize {
        (self.hand as usize * FINGERS_PER_HAND + self.finger as usize) * PHALANGES_PER_FINGER
            + self.phalanx as usize
    }

    /// Inverse of [`index`](Self::index)
    pub fn from_index(index: usize) -> Option<FingerBone> {
        if index >= FINGER_BONE_COUNT {
            return None;
        }
        let hand = [Hand::Left, Hand::Right][index / (FINGERS_PER_HAND * PHALANGES_PER_FINGER)];
        let finger = [
            Finger::Thumb,
            Finger::Index,
            Finger::Middle,
            Finger::Ring,
            Finger::Little,
        ][(index / PHALANGES_PER_FINGER) % FINGERS_PER_HAND];
        let phalanx = [Phalanx::Proximal, Phalanx::Intermediate, Phalanx::Distal]
            [index % PHALANGES_PER_FINGER];
        Some(FingerBone::new(hand, finger, phalanx))
    }
}

/// Finger rotations for both hands
#[derive(Debug, Clone, PartialEq)]
pub struct FingerFrame {
    /// Local rotations indexed by [`FingerBone::index`]
    pub rotations: [Quat; FINGER_BONE_COUNT],
}

impl Default for FingerFrame {
    fn default() -> Self {
        Self::open()
    }
}

impl FingerFrame {
    /// Flat open hands
    pub fn open() -> Self {
        FingerFrame {
            rotations: [Quat::IDENTITY; FINGER_BONE_COUNT],
        }
    }

    pub fn rotation(&self, bone: FingerBone) -> Quat {
        self.rotations[bone.index()]
    }

    pub fn set_rotation(&mut self, bone: FingerBone, rotation: Quat) {
        self.rotations[bone.index()] = rotation;
    }

    /// Rotations of one hand, in finger-then-phalanx order
    pub fn hand(&self, hand: Hand) -> &[Quat] {
        let per_hand = FINGERS_PER_HAND * PHALANGES_PER_FINGER;
        let start = hand as usize * per_hand;
        &self.rotations[start..start + per_hand]
    }
}

impl Lerp for FingerFrame {
    fn lerp(&self, other: &FingerFrame, t: f32) -> FingerFrame {
        FingerFrame {
            rotations: self.rotations.lerp(&other.rotations, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn test_index_roundtrip() {
        for index in 0..FINGER_BONE_COUNT {
            let bone = FingerBone::from_index(index).unwrap();
            assert_eq!(bone.index(), index);
        }
        assert!(FingerBone::from_index(FINGER_BONE_COUNT).is_none());
    }

    #[test]
    fn test_hand_slices() {
        let mut frame = FingerFrame::open();
        let curl = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.8);
        frame.set_rotation(FingerBone::new(Hand::Right, Finger::Thumb, Phalanx::Proximal), curl);

        assert_eq!(frame.hand(Hand::Right)[0], curl);
        assert!(frame.hand(Hand::Left).iter().all(|q| *q == Quat::IDENTITY));
    }

    #[test]
    fn test_finger_lerp_every_slot() {
        let a = FingerFrame::open();
        let curl = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 1.2);
        let b = FingerFrame {
            rotations: [curl; FINGER_BONE_COUNT],
        };

        let mid = a.lerp(&b, 0.5);
        let expected = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.6);
        for q in mid.rotations.iter() {
            assert!((q.dot(&expected) - 1.0).abs() < 1e-5);
            assert!((q.length() - 1.0).abs() < 1e-5);
        }
    }
}
