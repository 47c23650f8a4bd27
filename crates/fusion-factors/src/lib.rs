//! # Fusion Factors
//!
//! Residual factors for multi-sensor orientation and pose fusion.
//!
//! Each factor encodes the discrepancy between a sensor measurement and the
//! current estimate of one or two parameter blocks (orientations, poses, or a
//! scalar time offset), weighted by the inverse of the measurement
//! covariance. Factors are written once, generic over the numeric type, and
//! differentiated with dual numbers; the result is a [`CostFunction`] ready
//! to be registered with a nonlinear least-squares solver.
//!
//! ## Factor Catalog
//!
//! | Factor | Blocks | Residual |
//! |---|---|---|
//! | [`OrientationFactor`] | orientation (4) | 3 |
//! | [`RelativePoseFactor`] | pose (7), pose (7) | 6 |
//! | [`RangeFactor`] | pose (7), pose (7) | 1 |
//! | [`AltitudeFactor`] | pose (7) | 1 |
//! | [`TimeSyncAttitudeFactor`] | scalar (1) | 3 |
//! | [`OrientationOffsetFactor`] | orientation (4) | 3 |
//! | [`PoseOffsetFactor`] | pose (7) | 6 |
//! | [`PoseReprojectionFactor`] | pose (7) | 2 |
//!
//! ## Quick Start
//!
//! ```rust
//! use fusion_factors::prelude::{CostFunction, FactorKind, OrientationFactor, RangeFactor, SO3};
//! use nalgebra::Vector3;
//!
//! let cost = RangeFactor::create(5.0, 0.01)?;
//! assert_eq!(cost.parameter_block_sizes(), FactorKind::Range.parameter_block_sizes());
//!
//! let pose_i = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
//! let pose_j = [3.0, 4.0, 0.0, 1.0, 0.0, 0.0, 0.0];
//! let residual = cost.residuals(&[pose_i.as_slice(), pose_j.as_slice()])?;
//! assert!(residual[0].abs() < 1e-12);
//!
//! let orientation = OrientationFactor::create(
//!     SO3::from_axis_angle(&Vector3::z(), 0.1),
//!     &nalgebra::Matrix3::identity(),
//! )?;
//! assert_eq!(orientation.num_residuals(), 3);
//! # Ok::<(), fusion_factors::FactorError>(())
//! ```
//!
//! ## Crates
//!
//! - [`fusion_factors_core`]: traits, information matrices, derivative checks
//! - [`fusion_factors_manifolds`]: `SO3` / `SE3` and local parameterizations
//! - [`fusion_factors_autodiff`]: dual-number cost functions

pub mod factors;
pub mod kind;
pub mod logger;

pub use factors::{
    AltitudeFactor, OrientationFactor, OrientationOffsetFactor, PinholeIntrinsics,
    PoseOffsetFactor, PoseReprojectionFactor, RangeFactor, RelativePoseFactor,
    TimeSyncAttitudeFactor,
};
pub use kind::FactorKind;
pub use logger::{init_logger, init_logger_with_level};

pub use fusion_factors_core::{cost_function::CostFunction, FactorError, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::factors::{
        AltitudeFactor, OrientationFactor, OrientationOffsetFactor, PinholeIntrinsics,
        PoseOffsetFactor, PoseReprojectionFactor, RangeFactor, RelativePoseFactor,
        TimeSyncAttitudeFactor,
    };
    pub use crate::kind::FactorKind;
    pub use fusion_factors_autodiff::prelude::*;
    pub use fusion_factors_core::prelude::*;
    pub use fusion_factors_manifolds::{
        LocalParameterization, PoseParameterization, QuaternionParameterization, SE3, SO3,
    };
}
