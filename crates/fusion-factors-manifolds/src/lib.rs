//! Fusion Factors Manifolds - orientation and pose parameter blocks.
//!
//! This crate implements the two Lie groups the factor catalog works with,
//! each generic over the numeric type so residuals evaluate with `f64` and
//! with dual numbers alike:
//!
//! - [`SO3`]: rotations as unit quaternions `[qw, qx, qy, qz]`
//! - [`SE3`]: rigid transforms `[tx, ty, tz, qw, qx, qy, qz]`
//!
//! It also provides the local parameterizations a solver pairs with these
//! blocks.

pub mod parameterization;
pub mod se3;
pub mod so3;
pub mod utils;

pub use parameterization::{LocalParameterization, PoseParameterization, QuaternionParameterization};
pub use se3::SE3;
pub use so3::SO3;
pub use utils::skew;
