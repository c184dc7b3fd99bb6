//! Face frames - blend shape weights and head rotation
//!
//! Face trackers rarely send every channel. A channel that was not sent is
//! `None`, and stays `None` through interpolation unless both ends carry it.

use crate::{Lerp, Quat};

macro_rules! blend_shapes {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// ARKit-style facial blend shape channel
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BlendShape {
            $($variant,)*
        }

        impl BlendShape {
            /// All channels in slot order
            pub const ALL: &'static [BlendShape] = &[$(BlendShape::$variant,)*];

            /// Channel name as sent by ARKit-based trackers
            pub fn name(self) -> &'static str {
                match self {
                    $(BlendShape::$variant => $name,)*
                }
            }
        }
    };
}

blend_shapes! {
    EyeBlinkLeft => "eyeBlinkLeft",
    EyeLookDownLeft => "eyeLookDownLeft",
    EyeLookInLeft => "eyeLookInLeft",
    EyeLookOutLeft => "eyeLookOutLeft",
    EyeLookUpLeft => "eyeLookUpLeft",
    EyeSquintLeft => "eyeSquintLeft",
    EyeWideLeft => "eyeWideLeft",
    EyeBlinkRight => "eyeBlinkRight",
    EyeLookDownRight => "eyeLookDownRight",
    EyeLookInRight => "eyeLookInRight",
    EyeLookOutRight => "eyeLookOutRight",
    EyeLookUpRight => "eyeLookUpRight",
    EyeSquintRight => "eyeSquintRight",
    EyeWideRight => "eyeWideRight",
    JawForward => "jawForward",
    JawLeft => "jawLeft",
    JawRight => "jawRight",
    JawOpen => "jawOpen",
    MouthClose => "mouthClose",
    MouthFunnel => "mouthFunnel",
    MouthPucker => "mouthPucker",
    MouthLeft => "mouthLeft",
    MouthRight => "mouthRight",
    MouthSmileLeft => "mouthSmileLeft",
    MouthSmileRight => "mouthSmileRight",
    MouthFrownLeft => "mouthFrownLeft",
    MouthFrownRight => "mouthFrownRight",
    MouthDimpleLeft => "mouthDimpleLeft",
    MouthDimpleRight => "mouthDimpleRight",
    MouthStretchLeft => "mouthStretchLeft",
    MouthStretchRight => "mouthStretchRight",
    MouthRollLower => "mouthRollLower",
    MouthRollUpper => "mouthRollUpper",
    MouthShrugLower => "mouthShrugLower",
    MouthShrugUpper => "mouthShrugUpper",
    MouthPressLeft => "mouthPressLeft",
    MouthPressRight => "mouthPressRight",
    MouthLowerDownLeft => "mouthLowerDownLeft",
    MouthLowerDownRight => "mouthLowerDownRight",
    MouthUpperUpLeft => "mouthUpperUpLeft",
    MouthUpperUpRight => "mouthUpperUpRight",
    BrowDownLeft => "browDownLeft",
    BrowDownRight => "browDownRight",
    BrowInnerUp => "browInnerUp",
    BrowOuterUpLeft => "browOuterUpLeft",
    BrowOuterUpRight => "browOuterUpRight",
    CheekPuff => "cheekPuff",
    CheekSquintLeft => "cheekSquintLeft",
    CheekSquintRight => "cheekSquintRight",
    NoseSneerLeft => "noseSneerLeft",
    NoseSneerRight => "noseSneerRight",
    TongueOut => "tongueOut",
}

/// Number of blend shape channels carried by a [`FaceFrame`]
pub const BLEND_SHAPE_COUNT: usize = 52;

impl BlendShape {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a channel by name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<BlendShape> {
        BlendShape::ALL
            .iter()
            .copied()
            .find(|shape| shape.name().eq_ignore_ascii_case(name))
    }
}

/// Facial expression state
#[derive(Debug, Clone, PartialEq)]
pub struct FaceFrame {
    /// Channel weights indexed by [`BlendShape::index`]; `None` = not sent
    pub weights: [Option<f32>; BLEND_SHAPE_COUNT],
    /// Head orientation, if the tracker reports it
    pub head_rotation: Option<Quat>,
}

impl Default for FaceFrame {
    fn default() -> Self {
        Self::empty()
    }
}

impl FaceFrame {
    /// No channels present
    pub fn empty() -> Self {
        FaceFrame {
            weights: [None; BLEND_SHAPE_COUNT],
            head_rotation: None,
        }
    }

    /// Build from (channel, weight) pairs
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (BlendShape, f32)>,
    {
        let mut frame = Self::empty();
        for (shape, weight) in weights {
            frame.set(shape, weight);
        }
        frame
    }

    pub fn get(&self, shape: BlendShape) -> Option<f32> {
        self.weights[shape.index()]
    }

    pub fn set(&mut self, shape: BlendShape, weight: f32) {
        self.weights[shape.index()] = Some(weight);
    }

    pub fn unset(&mut self, shape: BlendShape) {
        self.weights[shape.index()] = None;
    }

    /// Number of channels present
    pub fn present_count(&self) -> usize {
        self.weights.iter().filter(|w| w.is_some()).count()
    }

    /// Present channels with their weights, in slot order
    pub fn present(&self) -> impl Iterator<Item = (BlendShape, f32)> + '_ {
        BlendShape::ALL
            .iter()
            .zip(self.weights.iter())
            .filter_map(|(shape, weight)| weight.map(|w| (*shape, w)))
    }
}

impl Lerp for FaceFrame {
    fn lerp(&self, other: &FaceFrame, t: f32) -> FaceFrame {
        FaceFrame {
            weights: self.weights.lerp(&other.weights, t),
            head_rotation: self.head_rotation.lerp(&other.head_rotation, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    #[test]
    fn test_channel_table() {
        assert_eq!(BlendShape::ALL.len(), BLEND_SHAPE_COUNT);
        for (i, shape) in BlendShape::ALL.iter().enumerate() {
            assert_eq!(shape.index(), i);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(BlendShape::from_name("jawOpen"), Some(BlendShape::JawOpen));
        assert_eq!(BlendShape::from_name("JAWOPEN"), Some(BlendShape::JawOpen));
        assert_eq!(BlendShape::from_name("tongueOut"), Some(BlendShape::TongueOut));
        assert_eq!(BlendShape::from_name("jaw_open"), None);
    }

    #[test]
    fn test_sparse_channels() {
        let a = FaceFrame::from_weights([
            (BlendShape::JawOpen, 0.0),
            (BlendShape::EyeBlinkLeft, 1.0),
        ]);
        let b = FaceFrame::from_weights([
            (BlendShape::JawOpen, 1.0),
            (BlendShape::MouthSmileLeft, 0.5),
        ]);

        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.get(BlendShape::JawOpen), Some(0.5));
        // Present on one side only
        assert_eq!(mid.get(BlendShape::EyeBlinkLeft), None);
        assert_eq!(mid.get(BlendShape::MouthSmileLeft), None);
        assert_eq!(mid.present_count(), 1);

        // Inputs keep their channels
        assert_eq!(a.get(BlendShape::EyeBlinkLeft), Some(1.0));
    }

    #[test]
    fn test_head_rotation() {
        let mut a = FaceFrame::empty();
        let mut b = FaceFrame::empty();
        a.head_rotation = Some(Quat::IDENTITY);
        b.head_rotation = Some(Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.4));

        let mid = a.lerp(&b, 0.5).head_rotation.unwrap();
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.2);
        assert!((mid.dot(&expected) - 1.0).abs() < 1e-5);

        b.head_rotation = None;
        assert_eq!(a.lerp(&b, 0.5).head_rotation, None);
    }

    #[test]
    fn test_present_iter() {
        let mut frame = FaceFrame::empty();
        frame.set(BlendShape::CheekPuff, 0.3);
        frame.set(BlendShape::BrowInnerUp, 0.7);
        frame.unset(BlendShape::CheekPuff);

        let present: Vec<_> = frame.present().collect();
        assert_eq!(present, vec![(BlendShape::BrowInnerUp, 0.7)]);
    }
}
