//! Time-offset estimation from attitude measurements.

use super::{log_creation, write_residual};
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, UnaryResidual},
    information::InformationMatrix,
    manifold::LieGroup,
    types::{lift_vector, SCALAR_COEFFS},
    Result,
};
use fusion_factors_manifolds::SO3;
use nalgebra::{Matrix3, RealField, Vector3};

/// Aligns two attitude streams by estimating the time offset `dt` between
/// them.
///
/// The orientation sampled from the delayed stream is propagated to first
/// order with its angular rate `ω` and compared with the reference:
///
/// ```text
/// r = Ω (q_ref ⊟ (q ⊞ dt·ω))
/// ```
///
/// `dt` is the only decision variable.
#[derive(Debug, Clone)]
pub struct TimeSyncAttitudeFactor {
    reference: SO3<f64>,
    orientation: SO3<f64>,
    angular_rate: Vector3<f64>,
    information: InformationMatrix<3>,
}

impl TimeSyncAttitudeFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::TimeSyncAttitude;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 3;
    /// One scalar time-offset block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [SCALAR_COEFFS];

    /// Creates the factor.
    ///
    /// # Arguments
    ///
    /// * `reference` - Orientation from the reference stream
    /// * `orientation` - Orientation from the stream being aligned
    /// * `angular_rate` - Body angular rate at `orientation`, in rad/s
    /// * `covariance` - 3x3 tangent-space covariance of the comparison
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance cannot be inverted.
    pub fn new(
        reference: SO3<f64>,
        orientation: SO3<f64>,
        angular_rate: Vector3<f64>,
        covariance: &Matrix3<f64>,
    ) -> Result<Self> {
        Ok(Self {
            reference,
            orientation,
            angular_rate,
            information: InformationMatrix::from_covariance(covariance)?,
        })
    }

    /// Builds the cost function for one scalar block.
    pub fn create(
        reference: SO3<f64>,
        orientation: SO3<f64>,
        angular_rate: Vector3<f64>,
        covariance: &Matrix3<f64>,
    ) -> Result<Box<dyn CostFunction>> {
        let factor = Self::new(reference, orientation, angular_rate, covariance)?;
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 3, SCALAR_COEFFS>::new(
            factor,
        )))
    }

    /// Reference orientation at the other sensor's timestamp.
    pub fn reference(&self) -> &SO3<f64> {
        &self.reference
    }

    /// Orientation at this sensor's timestamp.
    pub fn orientation(&self) -> &SO3<f64> {
        &self.orientation
    }

    /// Body angular rate used to propagate across the time offset.
    pub fn angular_rate(&self) -> &Vector3<f64> {
        &self.angular_rate
    }

    /// Tangent-space information matrix.
    pub fn information(&self) -> &InformationMatrix<3> {
        &self.information
    }
}

impl UnaryResidual<3, SCALAR_COEFFS> for TimeSyncAttitudeFactor {
    fn evaluate<T: RealField>(&self, dt: &[T; SCALAR_COEFFS], residual: &mut [T; 3]) -> bool {
        let step = lift_vector::<T, 3>(&self.angular_rate) * dt[0].clone();
        let propagated = self.orientation.cast::<T>().plus(&step);
        let error = self.reference.cast::<T>().minus(&propagated);
        write_residual(&self.information.weight(&error), residual);
        true
    }
}
