//! Relative pose factor between two poses.

use super::{log_creation, write_residual};
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffPairCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, PairResidual},
    information::InformationMatrix,
    manifold::LieGroup,
    types::{Matrix6, POSE_COEFFS},
    Result,
};
use fusion_factors_manifolds::SE3;
use nalgebra::RealField;

/// Relative transform between two poses, e.g. from odometry or a loop
/// closure.
///
/// ```text
/// r = Ω ((Xᵢ⁻¹ ∘ Xⱼ) ⊟ Xᵢⱼ)
/// ```
///
/// The covariance is expressed in the `[ρ; ω]` tangent space of the measured
/// transform.
#[derive(Debug, Clone)]
pub struct RelativePoseFactor {
    measured: SE3<f64>,
    information: InformationMatrix<6>,
}

impl RelativePoseFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::RelativePose;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 6;
    /// Poses `i` and `j`.
    pub const PARAMETER_BLOCK_SIZES: [usize; 2] = [POSE_COEFFS, POSE_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance cannot be inverted.
    pub fn new(measured: SE3<f64>, covariance: &Matrix6<f64>) -> Result<Self> {
        Ok(Self {
            measured,
            information: InformationMatrix::from_covariance(covariance)?,
        })
    }

    /// Builds the cost function over poses `i` and `j`.
    pub fn create(measured: SE3<f64>, covariance: &Matrix6<f64>) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(measured, covariance)?;
        log_creation(Self::KIND);
        Ok(Box::new(
            AutoDiffPairCostFunction::<_, 6, POSE_COEFFS, POSE_COEFFS>::new(factor),
        ))
    }

    /// Measured relative pose `Xᵢ⁻¹ Xⱼ`.
    pub fn measured(&self) -> &SE3<f64> {
        &self.measured
    }

    /// Tangent-space information matrix, `[ρ; ω]` ordering.
    pub fn information(&self) -> &InformationMatrix<6> {
        &self.information
    }
}

impl PairResidual<6, POSE_COEFFS, POSE_COEFFS> for RelativePoseFactor {
    fn evaluate<T: RealField>(
        &self,
        pose_i: &[T; POSE_COEFFS],
        pose_j: &[T; POSE_COEFFS],
        residual: &mut [T; 6],
    ) -> bool {
        let xi = SE3::from_coeffs(pose_i);
        let xj = SE3::from_coeffs(pose_j);
        let error = xi.inverse().compose(&xj).minus(&self.measured.cast::<T>());
        write_residual(&self.information.weight(&error), residual);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fusion_factors_core::types::Vector6;
    use fusion_factors_manifolds::SO3;
    use nalgebra::Vector3;

    fn pose(angle: f64, t: Vector3<f64>) -> SE3<f64> {
        SE3::new(SO3::from_axis_angle(&Vector3::new(0.3, -0.2, 1.0), angle), t)
    }

    #[test]
    fn test_consistent_poses_give_zero_residual() {
        let xi = pose(0.4, Vector3::new(1.0, 2.0, 0.5));
        let xij = pose(-0.9, Vector3::new(-0.5, 0.1, 3.0));
        let xj = xi.compose(&xij);

        let factor = RelativePoseFactor::new(xij, &Matrix6::identity()).unwrap();
        let a: [f64; 7] = xi.coeffs().into();
        let b: [f64; 7] = xj.coeffs().into();
        let r = factor.residual(&a, &b).unwrap();
        assert_relative_eq!(r, Vector6::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_translation_error() {
        let factor =
            RelativePoseFactor::new(SE3::identity(), &(Matrix6::identity() * 0.25)).unwrap();
        let xi = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let xj = [0.1, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let r = factor.residual(&xi, &xj).unwrap();
        assert_relative_eq!(
            r,
            Vector6::new(0.4, 0.0, 0.0, 0.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }
}
