//! Vector and rotation primitives
//!
//! Plain structs with no rendering-engine dependency.

use std::ops::{Add, Mul, Neg, Sub};

/// 3D vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Linear interpolation
    pub fn lerp(&self, other: &Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn distance(&self, other: &Vec3) -> f32 {
        (*self - *other).length()
    }

    pub fn normalize(&self) -> Vec3 {
        let len = self.length();
        if len < 1e-6 {
            return Vec3::ZERO;
        }
        *self * (1.0 / len)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Rotation quaternion (w + xi + yj + zk)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Above this |dot| the quaternions are nearly parallel and slerp degrades
/// to normalized lerp
const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        Quat {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    /// Rotation from yaw (Y), pitch (X) and roll (Z) in radians
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sr, cr) = (roll * 0.5).sin_cos();

        Quat {
            x: cy * sp * cr + sy * cp * sr,
            y: sy * cp * cr - cy * sp * sr,
            z: cy * cp * sr - sy * sp * cr,
            w: cy * cp * cr + sy * sp * sr,
        }
    }

    pub fn dot(&self, other: &Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Quat {
        let len = self.length();
        if len < 1e-4 {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
            w: self.w / len,
        }
    }

    pub fn conjugate(&self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Angle in radians between two rotations (0..=π)
    pub fn angle_to(&self, other: &Quat) -> f32 {
        let dot = self.normalize().dot(&other.normalize()).abs().min(1.0);
        2.0 * dot.acos()
    }

    /// Spherical linear interpolation along the shortest arc
    ///
    /// Returns `self` exactly for `t <= 0` and `other` exactly for `t >= 1`.
    pub fn slerp(&self, other: &Quat, t: f32) -> Quat {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }

        let mut dot = self.dot(other);

        // q and -q are the same rotation; flip to take the short way round
        let end = if dot < 0.0 {
            dot = -dot;
            Quat::new(-other.x, -other.y, -other.z, -other.w)
        } else {
            *other
        };

        if dot > SLERP_LINEAR_THRESHOLD {
            return Quat {
                x: self.x + (end.x - self.x) * t,
                y: self.y + (end.y - self.y) * t,
                z: self.z + (end.z - self.z) * t,
                w: self.w + (end.w - self.w) * t,
            }
            .normalize();
        }

        let theta = dot.acos();
        let sin_theta = theta.sin();
        let s0 = ((1.0 - t) * theta).sin() / sin_theta;
        let s1 = (t * theta).sin() / sin_theta;

        Quat {
            x: self.x * s0 + end.x * s1,
            y: self.y * s0 + end.y * s1,
            z: self.z * s0 + end.z * s1,
            w: self.w * s0 + end.w * s1,
        }
    }

    /// Rotate a vector
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let p = Quat::new(v.x, v.y, v.z, 0.0);
        let r = *self * p * self.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }
}

impl Mul for Quat {
    type Output = Quat;

    /// Hamilton product: `self` applied after `rhs`
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: &Quat, b: &Quat) -> bool {
        // Same rotation if q == b or q == -b
        (a.dot(b).abs() - 1.0).abs() < 1e-5
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 10.0, 10.0);

        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.01);
        assert!((mid.y - 5.0).abs() < 0.01);
        assert!((mid.z - 5.0).abs() < 0.01);
        assert!((a.distance(&b) - 300f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_slerp_endpoints_exact() {
        let a = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.3);
        let b = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 1.2);

        assert_eq!(a.slerp(&b, 0.0), a);
        assert_eq!(a.slerp(&b, 1.0), b);
    }

    #[test]
    fn test_slerp_halfway() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);

        let mid = a.slerp(&b, 0.5);
        assert!((mid.length() - 1.0).abs() < 1e-5);
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2 / 2.0);
        assert!(approx(&mid, &expected));
    }

    #[test]
    fn test_slerp_takes_shortest_arc() {
        let a = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.2);
        let b = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.6);
        let neg_b = Quat::new(-b.x, -b.y, -b.z, -b.w);

        let mid = a.slerp(&neg_b, 0.5);
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.4);
        assert!(approx(&mid, &expected));
    }

    #[test]
    fn test_slerp_nearly_parallel_stays_unit() {
        let a = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.001);
        let b = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), 0.002);
        let mid = a.slerp(&b, 0.5);
        assert!((mid.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_vector() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let v = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!(v.distance(&Vec3::new(0.0, 1.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_from_euler_yaw_matches_axis_angle() {
        let q = Quat::from_euler(0.7, 0.0, 0.0);
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7);
        assert!(approx(&q, &expected));
    }

    #[test]
    fn test_angle_to() {
        let a = Quat::IDENTITY;
        let b = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), PI / 3.0);
        assert!((a.angle_to(&b) - PI / 3.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_slerp_is_unit_and_between(
            ax in -1.0f32..1.0, ay in -1.0f32..1.0, az in 0.1f32..1.0,
            angle_a in -3.0f32..3.0, angle_b in -3.0f32..3.0, t in 0.0f32..1.0,
        ) {
            let axis = Vec3::new(ax, ay, az);
            let a = Quat::from_axis_angle(axis, angle_a);
            let b = Quat::from_axis_angle(axis, angle_b);
            let q = a.slerp(&b, t);

            prop_assert!((q.length() - 1.0).abs() < 1e-4);
            // Never further from either end than the ends are from each other
            let span = a.angle_to(&b);
            prop_assert!(a.angle_to(&q) <= span + 5e-3);
            prop_assert!(q.angle_to(&b) <= span + 5e-3);
        }
    }
}
