//! Blending rules for motion types
//!
//! Every motion value type implements [`Lerp`] with the rule that suits its
//! fields: component-wise for vectors and scalars, slerp for rotations,
//! present-in-both for optional channels, slot-by-slot for fixed arrays.
//! [`MotionInterpolator`] plugs any such type into a timed buffer.

use std::marker::PhantomData;

use kinesync_time::Interpolator;

use crate::{BodyFrame, EyeFrame, FaceFrame, FingerFrame, Quat, Vec3};

/// Interpolation between two values of the same type
pub trait Lerp: Sized {
    /// Blend toward `other` by `t`; neither input is modified
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &f32, t: f32) -> f32 {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3::lerp(self, other, t)
    }
}

impl Lerp for Quat {
    fn lerp(&self, other: &Quat, t: f32) -> Quat {
        self.slerp(other, t)
    }
}

/// Present only when present at both ends
impl<T: Lerp> Lerp for Option<T> {
    fn lerp(&self, other: &Option<T>, t: f32) -> Option<T> {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.lerp(b, t)),
            _ => None,
        }
    }
}

/// Every slot blended independently by the same rule
impl<T: Lerp, const N: usize> Lerp for [T; N] {
    fn lerp(&self, other: &[T; N], t: f32) -> [T; N] {
        std::array::from_fn(|i| self[i].lerp(&other[i], t))
    }
}

/// [`Interpolator`] for any [`Lerp`] type
pub struct MotionInterpolator<T>(PhantomData<fn() -> T>);

impl<T> MotionInterpolator<T> {
    pub fn new() -> Self {
        MotionInterpolator(PhantomData)
    }
}

impl<T> Default for MotionInterpolator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MotionInterpolator<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for MotionInterpolator<T> {}

impl<T> std::fmt::Debug for MotionInterpolator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MotionInterpolator<{}>", std::any::type_name::<T>())
    }
}

impl<T: Lerp> Interpolator<T> for MotionInterpolator<T> {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        start.lerp(end, t)
    }
}

pub type Vec3Interpolator = MotionInterpolator<Vec3>;
pub type QuatInterpolator = MotionInterpolator<Quat>;
pub type BodyInterpolator = MotionInterpolator<BodyFrame>;
pub type FingerInterpolator = MotionInterpolator<FingerFrame>;
pub type FaceInterpolator = MotionInterpolator<FaceFrame>;
pub type EyeInterpolator = MotionInterpolator<EyeFrame>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_requires_both() {
        let a = Some(0.0f32);
        let b = Some(1.0f32);
        assert_eq!(a.lerp(&b, 0.25), Some(0.25));
        assert_eq!(a.lerp(&None, 0.25), None);
        assert_eq!(None::<f32>.lerp(&b, 0.25), None);
    }

    #[test]
    fn test_array_per_slot() {
        let a = [0.0f32, 10.0, -4.0];
        let b = [1.0f32, 20.0, 4.0];
        assert_eq!(a.lerp(&b, 0.5), [0.5, 15.0, 0.0]);
    }

    #[test]
    fn test_interpolator_matches_lerp() {
        let interp = QuatInterpolator::new();
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 1.0);
        assert_eq!(interp.interpolate(&a, &b, 0.3), a.slerp(&b, 0.3));
        assert_eq!(interp.interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn test_inputs_untouched() {
        let interp = Vec3Interpolator::default();
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(3.0, 2.0, 1.0);
        let _ = interp.interpolate(&a, &b, 0.5);
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vec3::new(3.0, 2.0, 1.0));
    }
}
