//! Body frames - humanoid skeleton pose
//!
//! One frame holds the root transform plus a local transform for every
//! humanoid body bone. Fingers and eyes travel in their own frame types.

use crate::{Lerp, Quat, Vec3};

/// Humanoid body bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumanBone {
    // Torso
    Hips,
    Spine,
    Chest,
    UpperChest,
    Neck,
    Head,

    // Left arm
    LeftShoulder,
    LeftUpperArm,
    LeftLowerArm,
    LeftHand,

    // Right arm
    RightShoulder,
    RightUpperArm,
    RightLowerArm,
    RightHand,

    // Left leg
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    LeftToes,

    // Right leg
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
    RightToes,
}

/// Number of body bones carried by a [`BodyFrame`]
pub const BODY_BONE_COUNT: usize = 22;

impl HumanBone {
    /// All bones in slot order
    pub fn all() -> &'static [HumanBone; BODY_BONE_COUNT] {
        &[
            HumanBone::Hips,
            HumanBone::Spine,
            HumanBone::Chest,
            HumanBone::UpperChest,
            HumanBone::Neck,
            HumanBone::Head,
            HumanBone::LeftShoulder,
            HumanBone::LeftUpperArm,
            HumanBone::LeftLowerArm,
            HumanBone::LeftHand,
            HumanBone::RightShoulder,
            HumanBone::RightUpperArm,
            HumanBone::RightLowerArm,
            HumanBone::RightHand,
            HumanBone::LeftUpperLeg,
            HumanBone::LeftLowerLeg,
            HumanBone::LeftFoot,
            HumanBone::LeftToes,
            HumanBone::RightUpperLeg,
            HumanBone::RightLowerLeg,
            HumanBone::RightFoot,
            HumanBone::RightToes,
        ]
    }

    /// Slot index inside [`BodyFrame::bones`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bone on the other side of the body (torso bones map to themselves)
    pub fn mirror(self) -> HumanBone {
        use HumanBone::*;
        match self {
            LeftShoulder => RightShoulder,
            LeftUpperArm => RightUpperArm,
            LeftLowerArm => RightLowerArm,
            LeftHand => RightHand,
            RightShoulder => LeftShoulder,
            RightUpperArm => LeftUpperArm,
            RightLowerArm => LeftLowerArm,
            RightHand => LeftHand,
            LeftUpperLeg => RightUpperLeg,
            LeftLowerLeg => RightLowerLeg,
            LeftFoot => RightFoot,
            LeftToes => RightToes,
            RightUpperLeg => LeftUpperLeg,
            RightLowerLeg => LeftLowerLeg,
            RightFoot => LeftFoot,
            RightToes => LeftToes,
            torso => torso,
        }
    }
}

/// Local position + rotation of one bone
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl BoneTransform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation,
        }
    }
}

impl Lerp for BoneTransform {
    fn lerp(&self, other: &BoneTransform, t: f32) -> BoneTransform {
        BoneTransform {
            position: self.position.lerp(&other.position, t),
            rotation: self.rotation.slerp(&other.rotation, t),
        }
    }
}

/// Complete body pose
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame {
    /// Root position in tracking space
    pub root_position: Vec3,
    /// Root orientation in tracking space
    pub root_rotation: Quat,
    /// Bone transforms, indexed by [`HumanBone::index`]
    pub bones: [BoneTransform; BODY_BONE_COUNT],
}

impl Default for BodyFrame {
    fn default() -> Self {
        Self::rest()
    }
}

impl BodyFrame {
    /// Every bone at identity
    pub fn rest() -> Self {
        BodyFrame {
            root_position: Vec3::ZERO,
            root_rotation: Quat::IDENTITY,
            bones: [BoneTransform::default(); BODY_BONE_COUNT],
        }
    }

    pub fn bone(&self, bone: HumanBone) -> &BoneTransform {
        &self.bones[bone.index()]
    }

    pub fn bone_mut(&mut self, bone: HumanBone) -> &mut BoneTransform {
        &mut self.bones[bone.index()]
    }

    pub fn set_bone(&mut self, bone: HumanBone, transform: BoneTransform) {
        self.bones[bone.index()] = transform;
    }

    /// Set only the rotation of a bone
    pub fn set_rotation(&mut self, bone: HumanBone, rotation: Quat) {
        self.bones[bone.index()].rotation = rotation;
    }
}

impl Lerp for BodyFrame {
    fn lerp(&self, other: &BodyFrame, t: f32) -> BodyFrame {
        BodyFrame {
            root_position: self.root_position.lerp(&other.root_position, t),
            root_rotation: self.root_rotation.slerp(&other.root_rotation, t),
            bones: self.bones.lerp(&other.bones, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bone_table() {
        let all = HumanBone::all();
        assert_eq!(all.len(), BODY_BONE_COUNT);
        for (i, bone) in all.iter().enumerate() {
            assert_eq!(bone.index(), i);
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        for bone in HumanBone::all() {
            assert_eq!(bone.mirror().mirror(), *bone);
        }
        assert_eq!(HumanBone::LeftHand.mirror(), HumanBone::RightHand);
        assert_eq!(HumanBone::Head.mirror(), HumanBone::Head);
    }

    #[test]
    fn test_body_lerp() {
        let mut a = BodyFrame::rest();
        let mut b = BodyFrame::rest();
        b.root_position = Vec3::new(2.0, 0.0, 0.0);
        b.set_rotation(
            HumanBone::LeftUpperArm,
            Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 1.0),
        );
        a.set_bone(
            HumanBone::Hips,
            BoneTransform::new(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY),
        );
        b.bone_mut(HumanBone::Hips).position = Vec3::new(0.0, 2.0, 0.0);

        let mid = a.lerp(&b, 0.5);
        assert!((mid.root_position.x - 1.0).abs() < 1e-6);
        assert!((mid.bone(HumanBone::Hips).position.y - 1.5).abs() < 1e-6);

        let arm = mid.bone(HumanBone::LeftUpperArm).rotation;
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.5);
        assert!((arm.dot(&expected).abs() - 1.0).abs() < 1e-5);

        // Untouched bones stay at identity
        assert_eq!(mid.bone(HumanBone::Head).rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_body_lerp_endpoints() {
        let a = BodyFrame::rest();
        let mut b = BodyFrame::rest();
        b.set_rotation(HumanBone::Neck, Quat::from_euler(0.3, 0.1, 0.0));

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }
}
