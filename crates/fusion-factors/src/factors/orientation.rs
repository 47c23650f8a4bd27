//! Absolute orientation factor.

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

/// Orientation measured directly, e.g. by an attitude reference.
///
/// ```text
/// r = Ω (q_meas ⊟ q)
/// ```
///
/// where `Ω` is the inverse of the 3x3 tangent-space covariance.
#[derive(Debug, Clone)]
pub struct OrientationFactor {
    measured: SO3<f64>,
    information: InformationMatrix<3>,
}

impl OrientationFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::Orientation;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 3;
    /// One orientation block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [ORIENTATION_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance cannot be inverted.
    pub fn new(measured: SO3<f64>, covariance: &Matrix3<f64>) -> Result<Self> {
        Ok(Self {
            measured,
            information: InformationMatrix::from_covariance(covariance)?,
        })
    }

    /// Builds the cost function for one orientation block.
    pub fn create(measured: SO3<f64>, covariance: &Matrix3<f64>) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(measured, covariance)?;
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 3, ORIENTATION_COEFFS>::new(
            factor,
        )))
    }

    /// Measured orientation.
    pub fn measured(&self) -> &SO3<f64> {
        &self.measured
    }

    /// Tangent-space information matrix.
    pub fn information(&self) -> &InformationMatrix<3> {
        &self.information
    }
}

impl UnaryResidual<3, ORIENTATION_COEFFS> for OrientationFactor {
    fn evaluate<T: RealField>(&self, q: &[T; ORIENTATION_COEFFS], residual: &mut [T; 3]) -> bool {
        let estimated = SO3::from_coeffs(q);
        let error = self.measured.cast::<T>().minus(&estimated);
        write_residual(&self.information.weight(&error), residual);
        true
    }
}
