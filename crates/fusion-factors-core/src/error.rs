//! Error types for factor construction and evaluation.
//!
//! Factors fail at construction time only. Evaluation reports problems through
//! the boolean success flag that solvers expect, so the variants here describe
//! invalid measurement data and mismatched buffer layouts.

use thiserror::Error;

/// Errors that can occur while building or checking a factor.
#[derive(Debug, Clone, Error)]
pub enum FactorError {
    /// Covariance matrix cannot be inverted.
    ///
    /// This error occurs when the reciprocal condition number of the covariance
    /// falls below the configured threshold, so the information matrix would be
    /// dominated by rounding noise or contain infinities.
    #[error("Covariance is singular: reciprocal condition number {rcond:e} below {threshold:e}")]
    SingularCovariance {
        /// Smallest over largest singular value of the covariance
        rcond: f64,
        /// Configured minimum reciprocal condition number
        threshold: f64,
    },

    /// Covariance matrix contains NaN or infinite entries.
    #[error("Covariance contains non-finite entries")]
    NonFiniteCovariance,

    /// Covariance matrix is not symmetric.
    ///
    /// The asymmetry is measured as the largest absolute difference between
    /// mirrored entries, relative to the largest entry of the matrix.
    #[error("Covariance is not symmetric: relative asymmetry {asymmetry:e} exceeds {tolerance:e}")]
    AsymmetricCovariance {
        /// Largest relative difference between mirrored entries
        asymmetry: f64,
        /// Configured symmetry tolerance
        tolerance: f64,
    },

    /// Scalar variance is zero, negative, or not finite.
    #[error("Invalid variance {value}: must be finite and strictly positive")]
    InvalidVariance {
        /// The rejected variance
        value: f64,
    },

    /// Camera intrinsics cannot produce a projection.
    #[error("Invalid camera intrinsics: {reason}")]
    InvalidIntrinsics {
        /// Description of why the intrinsics are invalid
        reason: String,
    },

    /// Buffer length does not match the declared layout.
    ///
    /// This error occurs when a caller passes parameter blocks or residual
    /// buffers whose sizes differ from the metadata the cost function declared.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Evaluation reported failure.
    #[error("Evaluation failed: {reason}")]
    EvaluationFailed {
        /// Description of the failing evaluation
        reason: String,
    },
}

impl FactorError {
    /// Create a SingularCovariance error.
    pub fn singular_covariance(rcond: f64, threshold: f64) -> Self {
        Self::SingularCovariance { rcond, threshold }
    }

    /// Create an AsymmetricCovariance error.
    pub fn asymmetric_covariance(asymmetry: f64, tolerance: f64) -> Self {
        Self::AsymmetricCovariance {
            asymmetry,
            tolerance,
        }
    }

    /// Create an InvalidVariance error.
    pub fn invalid_variance(value: f64) -> Self {
        Self::InvalidVariance { value }
    }

    /// Create an InvalidIntrinsics error with a custom reason.
    pub fn invalid_intrinsics<S: Into<String>>(reason: S) -> Self {
        Self::InvalidIntrinsics {
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an EvaluationFailed error with a custom reason.
    pub fn evaluation_failed<S: Into<String>>(reason: S) -> Self {
        Self::EvaluationFailed {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce FactorError.
pub type Result<T> = std::result::Result<T, FactorError>;
