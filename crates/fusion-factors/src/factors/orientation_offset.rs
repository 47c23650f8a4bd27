//! Rotation offset calibration.

use super::{log_creation, write_residual};
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, UnaryResidual},
    information::InformationMatrix,
    manifold::LieGroup,
    types::ORIENTATION_COEFFS,
    Result,
};
use fusion_factors_manifolds::SO3;
use nalgebra::{Matrix3, RealField};

/// Estimates the fixed rotation between two sensors that both measure
/// attitude.
///
/// ```text
/// r = Ω (q_ref ⊟ (q ∘ q_off))
/// ```
///
/// The decision variable is `q_off`, the rotation taking the measuring
/// sensor's frame to the reference frame.
#[derive(Debug, Clone)]
pub struct OrientationOffsetFactor {
    reference: SO3<f64>,
    orientation: SO3<f64>,
    information: InformationMatrix<3>,
}

impl OrientationOffsetFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::OrientationOffset;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 3;
    /// One orientation offset block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [ORIENTATION_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance cannot be inverted.
    pub fn new(
        reference: SO3<f64>,
        orientation: SO3<f64>,
        covariance: &Matrix3<f64>,
    ) -> Result<Self> {
        Ok(Self {
            reference,
            orientation,
            information: InformationMatrix::from_covariance(covariance)?,
        })
    }

    /// Builds the cost function for one orientation offset block.
    pub fn create(
        reference: SO3<f64>,
        orientation: SO3<f64>,
        covariance: &Matrix3<f64>,
    ) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(reference, orientation, covariance)?;
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 3, ORIENTATION_COEFFS>::new(
            factor,
        )))
    }

    /// Reference orientation.
    pub fn reference(&self) -> &SO3<f64> {
        &self.reference
    }

    /// Orientation the offset is applied to.
    pub fn orientation(&self) -> &SO3<f64> {
        &self.orientation
    }

    /// Tangent-space information matrix.
    pub fn information(&self) -> &InformationMatrix<3> {
        &self.information
    }
}

impl UnaryResidual<3, ORIENTATION_COEFFS> for OrientationOffsetFactor {
    fn evaluate<T: RealField>(
        &self,
        offset: &[T; ORIENTATION_COEFFS],
        residual: &mut [T; 3],
    ) -> bool {
        let predicted = self.orientation.cast::<T>().compose(&SO3::from_coeffs(offset));
        let error = self.reference.cast::<T>().minus(&predicted);
        write_residual(&self.information.weight(&error), residual);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_identity_offset() {
        let q = SO3::from_axis_angle(&Vector3::new(0.0, 1.0, 1.0), 1.2);
        let factor = OrientationOffsetFactor::new(q.clone(), q, &Matrix3::identity()).unwrap();
        let r = factor.residual(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(r, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_recovers_true_offset() {
        let q = SO3::from_axis_angle(&Vector3::new(1.0, 0.0, 0.0), 0.3);
        let offset = SO3::from_axis_angle(&Vector3::new(0.0, 0.0, 1.0), -0.5);
        let reference = q.compose(&offset);
        let factor = OrientationOffsetFactor::new(reference, q, &Matrix3::identity()).unwrap();

        let coeffs: [f64; 4] = offset.coeffs().into();
        assert_relative_eq!(factor.residual(&coeffs).unwrap(), Vector3::zeros(), epsilon = 1e-12);

        let r = factor.residual(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(r, Vector3::new(0.0, 0.0, -0.5), epsilon = 1e-12);
    }
}
