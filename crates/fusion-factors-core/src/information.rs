//! Information-matrix preparation.
//!
//! Every weighted factor inverts its measurement covariance exactly once, at
//! construction, and keeps the inverse for the rest of its life. Validation
//! happens here so that a bad covariance is reported immediately instead of
//! leaking NaN or infinite weights into every later evaluation.

use crate::{
    config::InformationConfig,
    error::{FactorError, Result},
    types::{lift, lift_matrix, SSquareMatrix, SVector},
};
use nalgebra::{DMatrix, RealField};
use tracing::warn;

/// Inverse of an `N x N` covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct InformationMatrix<const N: usize> {
    matrix: SSquareMatrix<f64, N>,
}

impl<const N: usize> InformationMatrix<N> {
    /// Inverts `covariance` using the default [`InformationConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the covariance has non-finite entries, is not
    /// symmetric, or is singular.
    pub fn from_covariance(covariance: &SSquareMatrix<f64, N>) -> Result<Self> {
        Self::from_covariance_with_config(covariance, &InformationConfig::default())
    }

    /// Inverts `covariance` using explicit validation thresholds.
    pub fn from_covariance_with_config(
        covariance: &SSquareMatrix<f64, N>,
        config: &InformationConfig,
    ) -> Result<Self> {
        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(FactorError::NonFiniteCovariance);
        }

        let scale = covariance.amax();
        let asymmetry = if scale > 0.0 {
            (covariance - covariance.transpose()).amax() / scale
        } else {
            0.0
        };
        if asymmetry > config.symmetry_tolerance {
            return Err(FactorError::asymmetric_covariance(
                asymmetry,
                config.symmetry_tolerance,
            ));
        }

        let dense = DMatrix::from_column_slice(N, N, covariance.as_slice());
        let singular_values = dense.clone().singular_values();
        let largest = singular_values.max();
        let rcond = if largest > 0.0 {
            singular_values.min() / largest
        } else {
            0.0
        };
        // Negated comparison so that a NaN ratio is rejected as well.
        if !(rcond >= config.min_reciprocal_condition) {
            return Err(FactorError::singular_covariance(
                rcond,
                config.min_reciprocal_condition,
            ));
        }

        let inverse = match dense.clone().cholesky() {
            Some(cholesky) => cholesky.inverse(),
            None => {
                warn!(
                    dim = N,
                    rcond, "covariance is not positive definite, falling back to LU inverse"
                );
                dense.try_inverse().ok_or_else(|| {
                    FactorError::singular_covariance(rcond, config.min_reciprocal_condition)
                })?
            }
        };

        // A well-conditioned but tiny covariance still overflows on inversion.
        if inverse.iter().any(|v| !v.is_finite()) {
            return Err(FactorError::singular_covariance(
                rcond,
                config.min_reciprocal_condition,
            ));
        }

        let inverse = SSquareMatrix::<f64, N>::from_column_slice(inverse.as_slice());
        Ok(Self {
            matrix: (inverse + inverse.transpose()) * 0.5,
        })
    }

    /// The stored information matrix.
    pub fn matrix(&self) -> &SSquareMatrix<f64, N> {
        &self.matrix
    }

    /// Information matrix converted to the evaluation numeric type.
    pub fn cast<T: RealField>(&self) -> SSquareMatrix<T, N> {
        lift_matrix(&self.matrix)
    }

    /// Weights an error vector: `information * error`.
    pub fn weight<T: RealField>(&self, error: &SVector<T, N>) -> SVector<T, N> {
        self.cast::<T>() * error
    }
}

/// Inverse of a scalar variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarInformation {
    value: f64,
}

impl ScalarInformation {
    /// Inverts a variance.
    ///
    /// # Errors
    ///
    /// Returns [`FactorError::InvalidVariance`] if the variance is not a
    /// finite positive number or its inverse overflows.
    pub fn from_variance(variance: f64) -> Result<Self> {
        let value = 1.0 / variance;
        if !variance.is_finite() || variance <= 0.0 || !value.is_finite() {
            return Err(FactorError::invalid_variance(variance));
        }
        Ok(Self { value })
    }

    /// The stored inverse variance.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Weights a scalar error: `information * error`.
    pub fn weight<T: RealField>(&self, error: T) -> T {
        lift::<T>(self.value) * error
    }
}
