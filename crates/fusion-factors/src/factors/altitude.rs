//! Altitude factor on the vertical position of a pose.

use super::log_creation;
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, UnaryResidual},
    information::ScalarInformation,
    types::{lift, POSE_COEFFS},
    Result,
};
use nalgebra::RealField;

/// Index of `tz` in a pose block.
const TZ: usize = 2;

/// Measured height, e.g. from a barometer: `r = (h − t_z) / σ²`.
#[derive(Debug, Clone)]
pub struct AltitudeFactor {
    altitude: f64,
    information: ScalarInformation,
}

impl AltitudeFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::Altitude;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 1;
    /// One pose block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [POSE_COEFFS];

    /// Creates the factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the variance is not finite and positive.
    pub fn new(altitude: f64, variance: f64) -> Result<Self> {
        Ok(Self {
            altitude,
            information: ScalarInformation::from_variance(variance)?,
        })
    }

    /// Builds the cost function for one pose block.
    pub fn create(altitude: f64, variance: f64) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(altitude, variance)?;
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 1, POSE_COEFFS>::new(
            factor,
        )))
    }

    /// Measured altitude.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Inverse altitude variance.
    pub fn information(&self) -> &ScalarInformation {
        &self.information
    }
}

impl UnaryResidual<1, POSE_COEFFS> for AltitudeFactor {
    fn evaluate<T: RealField>(&self, pose: &[T; POSE_COEFFS], residual: &mut [T; 1]) -> bool {
        let error = lift::<T>(self.altitude) - pose[TZ].clone();
        residual[0] = self.information.weight(error);
        true
    }
}
