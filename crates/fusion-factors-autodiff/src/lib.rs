//! Forward-mode automatic differentiation for residual functors.
//!
//! Residual functors are written once, generic over the numeric type. This
//! crate evaluates them with `num-dual` dual numbers to obtain exact
//! Jacobians with respect to the raw coefficients of each parameter block,
//! and packages the result as a [`CostFunction`] a solver can register.
//!
//! # Example
//!
//! ```
//! use fusion_factors_autodiff::AutoDiffCostFunction;
//! use fusion_factors_core::prelude::*;
//! use nalgebra::RealField;
//!
//! /// r = x² - 4
//! #[derive(Debug)]
//! struct Square;
//!
//! impl UnaryResidual<1, 1> for Square {
//!     fn evaluate<T: RealField>(&self, x: &[T; 1], r: &mut [T; 1]) -> bool {
//!         r[0] = x[0].clone() * x[0].clone() - lift::<T>(4.0);
//!         true
//!     }
//! }
//!
//! let cost = AutoDiffCostFunction::new(Square);
//! let (r, j) = cost.linearize(&[&[3.0]]).unwrap();
//! assert_eq!(r[0], 5.0);
//! assert_eq!(j[0][(0, 0)], 6.0);
//! ```

pub mod cost_function;
pub mod dual;

pub use cost_function::{AutoDiffCostFunction, AutoDiffPairCostFunction};
pub use dual::{linearize_pair, linearize_unary};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cost_function::{AutoDiffCostFunction, AutoDiffPairCostFunction};
    pub use crate::dual::{linearize_pair, linearize_unary};
}
