//! Special orthogonal group SO(3) stored as a unit quaternion.
//!
//! Coefficient layout: `[qw, qx, qy, qz]` (Hamilton convention, scalar
//! first). Composition is the quaternion product, the inverse is the
//! conjugate, and the tangent space is the rotation vector `ω ∈ ℝ³`.
//!
//! All operations are written against [`RealField`] only, so the same code
//! evaluates with `f64` and with dual numbers. Near the identity the
//! exponential and logarithm switch to Taylor expansions that avoid taking
//! the square root of a vanishing norm, which keeps derivatives finite there.

use crate::utils::SMALL_ANGLE_SQ;
use fusion_factors_core::{
    manifold::LieGroup,
    types::{lift, ORIENTATION_COEFFS},
};
use nalgebra::{Matrix3, RealField, Scalar, Vector3, Vector4};
use rand::Rng;
use rand_distr::StandardNormal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D rotation.
///
/// Rotation coefficients are used as given: construction does not
/// normalize, matching how solvers hand over blocks already kept on the unit
/// sphere by their manifold-aware update.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SO3<T: Scalar> {
    w: T,
    xyz: Vector3<T>,
}

impl<T: RealField> SO3<T> {
    /// Creates a rotation from quaternion components.
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Self {
            w,
            xyz: Vector3::new(x, y, z),
        }
    }

    /// Creates a rotation from scalar and vector parts.
    pub fn from_parts(w: T, xyz: Vector3<T>) -> Self {
        Self { w, xyz }
    }

    /// Creates a rotation of `angle` radians about `axis`.
    pub fn from_axis_angle(axis: &Vector3<T>, angle: T) -> Self {
        let axis = axis.normalize();
        Self::exp(&(axis * angle))
    }

    /// Quaternion scalar part.
    pub fn w(&self) -> &T {
        &self.w
    }

    /// Quaternion vector part.
    pub fn xyz(&self) -> &Vector3<T> {
        &self.xyz
    }

    /// Coefficients as `[qw, qx, qy, qz]`.
    pub fn coeffs(&self) -> Vector4<T> {
        Vector4::new(
            self.w.clone(),
            self.xyz.x.clone(),
            self.xyz.y.clone(),
            self.xyz.z.clone(),
        )
    }

    /// Returns the rotation scaled to unit norm.
    pub fn normalized(&self) -> Self {
        let norm = (self.w.clone() * self.w.clone() + self.xyz.norm_squared()).sqrt();
        Self::from_parts(self.w.clone() / norm.clone(), &self.xyz / norm)
    }

    /// Rotates a vector.
    pub fn rotate(&self, v: &Vector3<T>) -> Vector3<T> {
        let two = lift::<T>(2.0);
        let uv = self.xyz.cross(v);
        let uuv = self.xyz.cross(&uv);
        v + uv * (two.clone() * self.w.clone()) + uuv * two
    }

    /// Equivalent 3x3 rotation matrix.
    pub fn to_rotation_matrix(&self) -> Matrix3<T> {
        let (w, x, y, z) = (
            self.w.clone(),
            self.xyz.x.clone(),
            self.xyz.y.clone(),
            self.xyz.z.clone(),
        );
        let one = T::one();
        let two = lift::<T>(2.0);
        let (xx, yy, zz) = (x.clone() * x.clone(), y.clone() * y.clone(), z.clone() * z.clone());
        let (xy, xz, yz) = (x.clone() * y.clone(), x.clone() * z.clone(), y.clone() * z.clone());
        let (wx, wy, wz) = (w.clone() * x, w.clone() * y, w * z);

        Matrix3::new(
            one.clone() - two.clone() * (yy.clone() + zz.clone()),
            two.clone() * (xy.clone() - wz.clone()),
            two.clone() * (xz.clone() + wy.clone()),
            two.clone() * (xy + wz),
            one.clone() - two.clone() * (xx.clone() + zz),
            two.clone() * (yz.clone() - wx.clone()),
            two.clone() * (xz - wy),
            two.clone() * (yz + wx),
            one - two * (xx + yy),
        )
    }

    /// Rotation angle in `[0, π]`.
    pub fn angle(&self) -> T {
        self.log().norm()
    }
}

impl SO3<f64> {
    /// Converts stored `f64` coefficients into another numeric type.
    pub fn cast<U: RealField>(&self) -> SO3<U> {
        SO3::from_parts(lift(self.w), self.xyz.map(lift::<U>))
    }

    /// Draws a rotation uniformly from SO(3).
    ///
    /// The scalar part of the result is non-negative.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut q: Vector4<f64> = Vector4::from_fn(|_, _| rng.sample(StandardNormal));
        while q.norm_squared() < 1e-12 {
            q = Vector4::from_fn(|_, _| rng.sample(StandardNormal));
        }
        if q[0] < 0.0 {
            q = -q;
        }
        let q = q.normalize();
        Self::new(q[0], q[1], q[2], q[3])
    }
}

impl<T: RealField> LieGroup<T> for SO3<T> {
    type Tangent = Vector3<T>;

    const NUM_COEFFS: usize = ORIENTATION_COEFFS;
    const DOF: usize = 3;

    fn identity() -> Self {
        Self::from_parts(T::one(), Vector3::zeros())
    }

    fn from_coeffs(coeffs: &[T]) -> Self {
        debug_assert_eq!(coeffs.len(), ORIENTATION_COEFFS);
        Self::new(
            coeffs[0].clone(),
            coeffs[1].clone(),
            coeffs[2].clone(),
            coeffs[3].clone(),
        )
    }

    fn write_coeffs(&self, out: &mut [T]) {
        debug_assert_eq!(out.len(), ORIENTATION_COEFFS);
        out[0] = self.w.clone();
        out[1] = self.xyz.x.clone();
        out[2] = self.xyz.y.clone();
        out[3] = self.xyz.z.clone();
    }

    fn compose(&self, other: &Self) -> Self {
        let w = self.w.clone() * other.w.clone() - self.xyz.dot(&other.xyz);
        let xyz = &other.xyz * self.w.clone()
            + &self.xyz * other.w.clone()
            + self.xyz.cross(&other.xyz);
        Self::from_parts(w, xyz)
    }

    fn inverse(&self) -> Self {
        Self::from_parts(self.w.clone(), -self.xyz.clone())
    }

    fn exp(omega: &Vector3<T>) -> Self {
        let theta_sq = omega.norm_squared();
        if theta_sq < lift(SMALL_ANGLE_SQ) {
            let w = T::one() - theta_sq.clone() / lift::<T>(8.0);
            let scale = lift::<T>(0.5) - theta_sq / lift::<T>(48.0);
            return Self::from_parts(w, omega * scale);
        }
        let theta = theta_sq.sqrt();
        let half = theta.clone() * lift::<T>(0.5);
        Self::from_parts(half.clone().cos(), omega * (half.sin() / theta))
    }

    fn log(&self) -> Vector3<T> {
        // q and -q are the same rotation; pick the representative with w >= 0
        // so the result lies in the ball of radius π.
        let (w, xyz) = if self.w < T::zero() {
            (-self.w.clone(), -self.xyz.clone())
        } else {
            (self.w.clone(), self.xyz.clone())
        };

        let sin_sq = xyz.norm_squared();
        if sin_sq < lift(SMALL_ANGLE_SQ) {
            let w_sq = w.clone() * w.clone();
            let scale = lift::<T>(2.0) / w * (T::one() - sin_sq / (lift::<T>(3.0) * w_sq));
            return xyz * scale;
        }
        let sin_half = sin_sq.sqrt();
        let theta = lift::<T>(2.0) * sin_half.clone().atan2(w);
        xyz * (theta / sin_half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let id = SO3::<f64>::identity();
        assert_eq!(id.coeffs(), Vector4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(id.log(), Vector3::zeros());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = SO3::from_axis_angle(&Vector3::z(), FRAC_PI_2);
        let v = r.rotate(&Vector3::x());
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(r.to_rotation_matrix() * Vector3::x(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_exp_log_small_and_large() {
        for omega in [
            Vector3::new(1e-8, -2e-8, 3e-9),
            Vector3::new(0.4, -0.1, 0.25),
            Vector3::new(0.0, 3.0, 0.0),
        ] {
            let r = SO3::exp(&omega);
            assert_relative_eq!(r.log(), omega, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_exp_log_near_series_thresholds() {
        for theta in [2e-5, 1e-4, 1e-3] {
            let omega = Vector3::new(0.0, 0.6, -0.8) * theta;
            assert_relative_eq!(SO3::exp(&omega).log(), omega, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_log_picks_short_path() {
        let r = SO3::exp(&Vector3::new(0.0, 0.0, 0.3));
        let flipped = SO3::from_parts(-*r.w(), -r.xyz());
        assert_relative_eq!(flipped.log(), Vector3::new(0.0, 0.0, 0.3), epsilon = 1e-12);
    }

    #[test]
    fn test_coeff_round_trip() {
        let r = SO3::new(0.5, 0.5, -0.5, 0.5);
        let coeffs = r.to_coeffs();
        assert_eq!(coeffs, vec![0.5, 0.5, -0.5, 0.5]);
        assert_eq!(SO3::from_coeffs(&coeffs), r);
    }

    #[test]
    fn test_cast() {
        let r = SO3::new(0.5, 0.5, -0.5, 0.5);
        let c: SO3<f64> = r.cast();
        assert_eq!(c, r);
    }
}
