//! Local parameterizations for over-parameterized blocks.
//!
//! A solver stores orientations as 4 quaternion coefficients and poses as 7
//! coefficients, but both live on 3- and 6-dimensional manifolds. A local
//! parameterization supplies the update rule `x ⊞ δ` the solver applies after
//! each step, together with `∂(x ⊞ δ)/∂δ` at `δ = 0`, which maps Jacobians
//! with respect to raw coefficients into the local tangent space.
//!
//! Both implementations use the right-perturbation convention shared with the
//! factors, `x ⊞ δ = x ∘ Exp(δ)`.

use crate::{se3::SE3, so3::SO3};
use fusion_factors_core::{
    manifold::LieGroup,
    types::{Vector6, ORIENTATION_COEFFS, POSE_COEFFS},
};
use nalgebra::{Matrix4x3, SMatrix, Vector3};
use std::fmt::Debug;

/// Manifold-aware update rule for one parameter block.
pub trait LocalParameterization: Debug + Send + Sync {
    /// Coefficient count of the stored block.
    fn global_size(&self) -> usize;

    /// Dimension of the update vector.
    fn local_size(&self) -> usize;

    /// Computes `x ⊞ delta` into `x_plus_delta`.
    ///
    /// Returns `false` if a buffer length disagrees with the declared sizes.
    fn plus(&self, x: &[f64], delta: &[f64], x_plus_delta: &mut [f64]) -> bool;

    /// Writes `∂(x ⊞ δ)/∂δ` at `δ = 0` as a row-major
    /// `global_size x local_size` matrix.
    fn compute_jacobian(&self, x: &[f64], jacobian: &mut [f64]) -> bool;
}

/// Unit-quaternion orientation block, 4 coefficients, 3 degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuaternionParameterization;

impl QuaternionParameterization {
    /// Jacobian of `q ∘ Exp(δ)` at `δ = 0`.
    fn plus_jacobian(q: &SO3<f64>) -> Matrix4x3<f64> {
        let (w, v) = (*q.w(), q.xyz());
        0.5 * Matrix4x3::new(
            -v.x, -v.y, -v.z, //
            w, -v.z, v.y, //
            v.z, w, -v.x, //
            -v.y, v.x, w,
        )
    }
}

impl LocalParameterization for QuaternionParameterization {
    fn global_size(&self) -> usize {
        ORIENTATION_COEFFS
    }

    fn local_size(&self) -> usize {
        3
    }

    fn plus(&self, x: &[f64], delta: &[f64], x_plus_delta: &mut [f64]) -> bool {
        if x.len() != ORIENTATION_COEFFS || delta.len() != 3 || x_plus_delta.len() != ORIENTATION_COEFFS
        {
            return false;
        }
        let q = SO3::from_coeffs(x);
        q.plus(&Vector3::from_column_slice(delta))
            .write_coeffs(x_plus_delta);
        true
    }

    fn compute_jacobian(&self, x: &[f64], jacobian: &mut [f64]) -> bool {
        if x.len() != ORIENTATION_COEFFS || jacobian.len() != ORIENTATION_COEFFS * 3 {
            return false;
        }
        let j = Self::plus_jacobian(&SO3::from_coeffs(x));
        copy_row_major(&j, jacobian);
        true
    }
}

/// Pose block `[t; q]`, 7 coefficients, 6 degrees of freedom.
///
/// The update vector is ordered `[ρ; ω]` like the SE(3) tangent space.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseParameterization;

impl LocalParameterization for PoseParameterization {
    fn global_size(&self) -> usize {
        POSE_COEFFS
    }

    fn local_size(&self) -> usize {
        6
    }

    fn plus(&self, x: &[f64], delta: &[f64], x_plus_delta: &mut [f64]) -> bool {
        if x.len() != POSE_COEFFS || delta.len() != 6 || x_plus_delta.len() != POSE_COEFFS {
            return false;
        }
        let pose = SE3::from_coeffs(x);
        pose.plus(&Vector6::from_column_slice(delta))
            .write_coeffs(x_plus_delta);
        true
    }

    fn compute_jacobian(&self, x: &[f64], jacobian: &mut [f64]) -> bool {
        if x.len() != POSE_COEFFS || jacobian.len() != POSE_COEFFS * 6 {
            return false;
        }
        let pose = SE3::from_coeffs(x);

        // Translation moves with R ρ; the quaternion only with ω.
        let mut j = SMatrix::<f64, 7, 6>::zeros();
        j.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&pose.rotation().to_rotation_matrix());
        j.fixed_view_mut::<4, 3>(3, 3)
            .copy_from(&QuaternionParameterization::plus_jacobian(pose.rotation()));
        copy_row_major(&j, jacobian);
        true
    }
}

fn copy_row_major<const R: usize, const C: usize>(m: &SMatrix<f64, R, C>, out: &mut [f64]) {
    for row in 0..R {
        for col in 0..C {
            out[row * C + col] = m[(row, col)];
        }
    }
}
