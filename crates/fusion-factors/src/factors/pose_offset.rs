//! Pose offset calibration.

use super::{log_creation, write_residual};
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, UnaryResidual},
    information::InformationMatrix,
    manifold::LieGroup,
    types::{Matrix6, POSE_COEFFS},
    Result,
};
use fusion_factors_manifolds::SE3;
use nalgebra::RealField;

/// Estimates the fixed transform between two sensors that both measure pose,
/// e.g. a camera-to-body extrinsic from motion-capture and visual odometry.
///
/// ```text
/// r = Ω (T_ref ⊟ (T ∘ T_off))
/// ```
#[derive(Debug, Clone)]
pub struct PoseOffsetFactor {
    reference: SE3<f64>,
    pose: SE3<f64>,
    information: InformationMatrix<6>,
}

impl PoseOffsetFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::PoseOffset;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 6;
    /// One pose offset block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [POSE_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance cannot be inverted.
    pub fn new(reference: SE3<f64>, pose: SE3<f64>, covariance: &Matrix6<f64>) -> Result<Self> {
        Ok(Self {
            reference,
            pose,
            information: InformationMatrix::from_covariance(covariance)?,
        })
    }

    /// Builds the cost function for one pose offset block.
    pub fn create(
        reference: SE3<f64>,
        pose: SE3<f64>,
        covariance: &Matrix6<f64>,
    ) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(reference, pose, covariance)?;
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 6, POSE_COEFFS>::new(
            factor,
        )))
    }

    /// Reference pose.
    pub fn reference(&self) -> &SE3<f64> {
        &self.reference
    }

    /// Pose the offset is applied to.
    pub fn pose(&self) -> &SE3<f64> {
        &self.pose
    }

    /// Tangent-space information matrix, `[ρ; ω]` ordering.
    pub fn information(&self) -> &InformationMatrix<6> {
        &self.information
    }
}

impl UnaryResidual<6, POSE_COEFFS> for PoseOffsetFactor {
    fn evaluate<T: RealField>(&self, offset: &[T; POSE_COEFFS], residual: &mut [T; 6]) -> bool {
        let predicted = self.pose.cast::<T>().compose(&SE3::from_coeffs(offset));
        let error = self.reference.cast::<T>().minus(&predicted);
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

    const IDENTITY: [f64; 7] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];

    #[test]
    fn test_identity_offset() {
        let pose = SE3::new(
            SO3::from_axis_angle(&Vector3::y(), 0.8),
            Vector3::new(1.0, -1.0, 2.0),
        );
        let factor = PoseOffsetFactor::new(pose.clone(), pose, &Matrix6::identity()).unwrap();
        assert_relative_eq!(
            factor.residual(&IDENTITY).unwrap(),
            Vector6::zeros(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_lever_arm_offset() {
        let pose = SE3::new(
            SO3::from_axis_angle(&Vector3::z(), std::f64::consts::FRAC_PI_2),
            Vector3::zeros(),
        );
        let offset = SE3::from_translation(Vector3::new(0.5, 0.0, 0.0));
        let reference = pose.compose(&offset);
        assert_relative_eq!(
            *reference.translation(),
            Vector3::new(0.0, 0.5, 0.0),
            epsilon = 1e-12
        );

        let factor = PoseOffsetFactor::new(reference, pose, &Matrix6::identity()).unwrap();
        let coeffs: [f64; 7] = offset.coeffs().into();
        assert_relative_eq!(
            factor.residual(&coeffs).unwrap(),
            Vector6::zeros(),
            epsilon = 1e-12
        );
    }
}
