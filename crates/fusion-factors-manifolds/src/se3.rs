//! Special Euclidean group SE(3): rigid transforms in 3D.
//!
//! Coefficient layout: `[tx, ty, tz, qw, qx, qy, qz]`, translation first.
//! Tangent vectors are ordered `[ρ; ω]` where `ω` is the rotation vector and
//! `ρ` the translational component, related to the translation through the
//! SO(3) left Jacobian: `t = V(ω) ρ`.

use crate::{
    so3::SO3,
    utils::left_jacobian_and_inverse,
};
use fusion_factors_core::{
    manifold::LieGroup,
    types::{lift, Vector6, Vector7, POSE_COEFFS},
};
use nalgebra::{Matrix4, RealField, Scalar, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid transform `x ↦ R x + t`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SE3<T: Scalar> {
    rotation: SO3<T>,
    translation: Vector3<T>,
}

impl<T: RealField> SE3<T> {
    /// Creates a transform from its rotation and translation.
    pub fn new(rotation: SO3<T>, translation: Vector3<T>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vector3<T>) -> Self {
        Self::new(SO3::identity(), translation)
    }

    /// Rotation part.
    pub fn rotation(&self) -> &SO3<T> {
        &self.rotation
    }

    /// Translation part.
    pub fn translation(&self) -> &Vector3<T> {
        &self.translation
    }

    /// Applies the transform to a point.
    pub fn transform_point(&self, point: &Vector3<T>) -> Vector3<T> {
        self.rotation.rotate(point) + &self.translation
    }

    /// Coefficients as `[tx, ty, tz, qw, qx, qy, qz]`.
    pub fn coeffs(&self) -> Vector7<T> {
        let mut out = Vector7::<T>::zeros();
        self.write_coeffs(out.as_mut_slice());
        out
    }

    /// Homogeneous 4x4 matrix.
    pub fn to_matrix(&self) -> Matrix4<T> {
        let mut m = Matrix4::<T>::identity();
        m.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.rotation.to_rotation_matrix());
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }
}

impl SE3<f64> {
    /// Converts stored `f64` coefficients into another numeric type.
    pub fn cast<U: RealField>(&self) -> SE3<U> {
        SE3::new(self.rotation.cast(), self.translation.map(lift::<U>))
    }

    /// Draws a transform with uniform rotation and Gaussian translation of
    /// standard deviation `translation_scale`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, translation_scale: f64) -> Self {
        let rotation = SO3::random(rng);
        let translation =
            Vector3::from_fn(|_, _| rng.sample::<f64, _>(StandardNormal) * translation_scale);
        Self::new(rotation, translation)
    }
}

impl<T: RealField> LieGroup<T> for SE3<T> {
    type Tangent = Vector6<T>;

    const NUM_COEFFS: usize = POSE_COEFFS;
    const DOF: usize = 6;

    fn identity() -> Self {
        Self::new(SO3::identity(), Vector3::zeros())
    }

    fn from_coeffs(coeffs: &[T]) -> Self {
        debug_assert_eq!(coeffs.len(), POSE_COEFFS);
        Self::new(
            SO3::from_coeffs(&coeffs[3..7]),
            Vector3::new(coeffs[0].clone(), coeffs[1].clone(), coeffs[2].clone()),
        )
    }

    fn write_coeffs(&self, out: &mut [T]) {
        debug_assert_eq!(out.len(), POSE_COEFFS);
        out[0] = self.translation.x.clone();
        out[1] = self.translation.y.clone();
        out[2] = self.translation.z.clone();
        self.rotation.write_coeffs(&mut out[3..7]);
    }

    fn compose(&self, other: &Self) -> Self {
        Self::new(
            self.rotation.compose(&other.rotation),
            self.transform_point(&other.translation),
        )
    }

    fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let translation = -rotation.rotate(&self.translation);
        Self::new(rotation, translation)
    }

    fn exp(tangent: &Vector6<T>) -> Self {
        let rho = tangent.fixed_rows::<3>(0).into_owned();
        let omega = tangent.fixed_rows::<3>(3).into_owned();
        let (v, _) = left_jacobian_and_inverse(&omega);
        Self::new(SO3::exp(&omega), v * rho)
    }

    fn log(&self) -> Vector6<T> {
        let omega = self.rotation.log();
        let (_, v_inv) = left_jacobian_and_inverse(&omega);
        let rho = v_inv * &self.translation;

        let mut out = Vector6::<T>::zeros();
        out.fixed_rows_mut::<3>(0).copy_from(&rho);
        out.fixed_rows_mut::<3>(3).copy_from(&omega);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_coeff_layout() {
        let pose = SE3::new(SO3::new(0.5, 0.5, 0.5, 0.5), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.to_coeffs(), vec![1.0, 2.0, 3.0, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(SE3::from_coeffs(&pose.to_coeffs()), pose);
    }

    #[test]
    fn test_compose_and_transform() {
        let a = SE3::new(
            SO3::from_axis_angle(&Vector3::z(), FRAC_PI_2),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let b = SE3::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let ab = a.compose(&b);
        assert_relative_eq!(*ab.translation(), Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);

        let p = Vector3::new(0.2, -0.3, 0.5);
        assert_relative_eq!(
            ab.transform_point(&p),
            a.transform_point(&b.transform_point(&p)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_inverse() {
        let pose = SE3::new(
            SO3::from_axis_angle(&Vector3::new(1.0, 1.0, 0.0), 0.7),
            Vector3::new(0.3, -2.0, 1.0),
        );
        let id = pose.compose(&pose.inverse());
        assert_relative_eq!(id.log(), Vector6::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_exp_log() {
        for xi in [
            Vector6::new(0.1, -0.2, 0.3, 0.4, -0.5, 0.6),
            Vector6::new(1.0, 2.0, 3.0, 1e-9, 0.0, -1e-9),
            Vector6::zeros(),
        ] {
            assert_relative_eq!(SE3::exp(&xi).log(), xi, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_exp_log_at_small_rotations() {
        for theta in [2e-5, 1e-4, 1e-3] {
            let xi = Vector6::new(1.5, -0.7, 2.0, theta, -theta, 0.5 * theta);
            assert_relative_eq!(SE3::exp(&xi).log(), xi, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_to_matrix() {
        let pose = SE3::new(
            SO3::from_axis_angle(&Vector3::x(), 0.3),
            Vector3::new(1.0, 2.0, 3.0),
        );
        let m = pose.to_matrix();
        let p = Vector3::new(0.5, 0.1, -0.4);
        let hp = m * p.push(1.0);
        assert_relative_eq!(hp.xyz(), pose.transform_point(&p), epsilon = 1e-12);
    }
}
