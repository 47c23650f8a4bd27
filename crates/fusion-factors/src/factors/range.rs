//! Range factor between the positions of two poses.

use super::log_creation;
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffPairCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, PairResidual},
    information::ScalarInformation,
    types::{lift, POSE_COEFFS},
    Result,
};
use nalgebra::{RealField, Vector3};

/// Measured distance between two pose origins, e.g. from UWB ranging.
///
/// ```text
/// r = (d − ‖tⱼ − tᵢ‖) / σ²
/// ```
///
/// Only the translation coefficients of the two blocks are read; their
/// orientation Jacobians are zero. When the translations coincide the
/// residual is finite but the norm has no derivative, so the Jacobian there
/// is not finite.
#[derive(Debug, Clone)]
pub struct RangeFactor {
    range: f64,
    information: ScalarInformation,
}

impl RangeFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::Range;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 1;
    /// Poses `i` and `j`.
    pub const PARAMETER_BLOCK_SIZES: [usize; 2] = [POSE_COEFFS, POSE_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the variance is not finite and positive.
    pub fn new(range: f64, variance: f64) -> Result<Self> {
        Ok(Self {
            range,
            information: ScalarInformation::from_variance(variance)?,
        })
    }

    /// Builds the cost function over poses `i` and `j`.
    pub fn create(range: f64, variance: f64) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(range, variance)?;
        log_creation(Self::KIND);
        Ok(Box::new(
            AutoDiffPairCostFunction::<_, 1, POSE_COEFFS, POSE_COEFFS>::new(factor),
        ))
    }

    /// Measured distance.
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Inverse range variance.
    pub fn information(&self) -> &ScalarInformation {
        &self.information
    }
}

impl PairResidual<1, POSE_COEFFS, POSE_COEFFS> for RangeFactor {
    fn evaluate<T: RealField>(
        &self,
        pose_i: &[T; POSE_COEFFS],
        pose_j: &[T; POSE_COEFFS],
        residual: &mut [T; 1],
    ) -> bool {
        let ti = Vector3::new(pose_i[0].clone(), pose_i[1].clone(), pose_i[2].clone());
        let tj = Vector3::new(pose_j[0].clone(), pose_j[1].clone(), pose_j[2].clone());
        let error = lift::<T>(self.range) - (tj - ti).norm();
        residual[0] = self.information.weight(error);
        true
    }
}
