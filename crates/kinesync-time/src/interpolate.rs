//! Interpolation strategies
//!
//! A [`TimedDataBuffer`](crate::TimedDataBuffer) does not know how to blend
//! its values; it is handed an [`Interpolator`] for the value type. The
//! buffer always passes `t` in `[0, 1]`, other callers may not.

use std::sync::Arc;

/// Produces a value between `start` and `end`
pub trait Interpolator<T> {
    /// Blend `start` toward `end` by `t` (0 = start, 1 = end)
    ///
    /// Must not mutate its inputs.
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T;
}

impl<T, I: Interpolator<T> + ?Sized> Interpolator<T> for Box<I> {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        (**self).interpolate(start, end, t)
    }
}

impl<T, I: Interpolator<T> + ?Sized> Interpolator<T> for Arc<I> {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        (**self).interpolate(start, end, t)
    }
}

impl<T, I: Interpolator<T> + ?Sized> Interpolator<T> for &I {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        (**self).interpolate(start, end, t)
    }
}

/// Plain linear interpolation for scalars
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl Interpolator<f32> for LinearInterpolator {
    fn interpolate(&self, start: &f32, end: &f32, t: f32) -> f32 {
        start + (end - start) * t
    }
}

impl Interpolator<f64> for LinearInterpolator {
    fn interpolate(&self, start: &f64, end: &f64, t: f32) -> f64 {
        start + (end - start) * t as f64
    }
}

/// Holds `start` for the first half of the segment, then `end`
///
/// For discrete values (flags, enum states) that have no meaningful blend.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInterpolator;

impl<T: Clone> Interpolator<T> for StepInterpolator {
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        if t < 0.5 {
            start.clone()
        } else {
            end.clone()
        }
    }
}

/// Adapts a closure into an [`Interpolator`]
#[derive(Clone, Copy)]
pub struct FnInterpolator<F>(pub F);

impl<T, F> Interpolator<T> for FnInterpolator<F>
where
    F: Fn(&T, &T, f32) -> T,
{
    fn interpolate(&self, start: &T, end: &T, t: f32) -> T {
        (self.0)(start, end, t)
    }
}
