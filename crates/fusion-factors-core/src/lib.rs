//! Core traits and types for sensor-fusion residual factors.
//!
//! This crate provides the foundational pieces that every factor is built
//! from: the Lie group abstraction for orientation and pose parameter blocks,
//! the generic residual functor traits, the object-safe cost function a
//! solver registers, and information-matrix preparation.
//!
//! # Key Concepts
//!
//! - **Residual functors**: Immutable callables generic over the numeric type,
//!   so one definition serves plain `f64` evaluation and dual-number
//!   differentiation
//! - **Information matrices**: Covariance inverses computed once at
//!   construction
//! - **Cost functions**: `f64` evaluation with Jacobians plus the static
//!   layout metadata a solver allocates storage from
//!
//! # Modules
//!
//! - [`config`]: Validation thresholds
//! - [`cost_function`]: Residual functor and cost function traits
//! - [`error`]: Error types for factor construction
//! - [`information`]: Covariance inversion
//! - [`manifold`]: Lie group trait for parameter blocks
//! - [`types`]: Type aliases, block sizes, and numeric casts
//! - [`validation`]: Finite-difference Jacobian checks

pub mod config;
pub mod cost_function;
pub mod error;
pub mod information;
pub mod manifold;
pub mod types;
pub mod validation;

// Re-export commonly used items at the crate root
pub use error::{FactorError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use fusion_factors_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{DerivativeCheckConfig, InformationConfig};
    pub use crate::cost_function::{CostFunction, PairResidual, UnaryResidual};
    pub use crate::error::{FactorError, Result};
    pub use crate::information::{InformationMatrix, ScalarInformation};
    pub use crate::manifold::LieGroup;
    pub use crate::types::{
        lift, lift_matrix, lift_vector, Matrix6, SMatrix, SSquareMatrix, SVector, Vector6,
        Vector7, ORIENTATION_COEFFS, POSE_COEFFS, SCALAR_COEFFS,
    };
    pub use crate::validation::{BlockCheck, DerivativeCheckReport, DerivativeChecker};
}
