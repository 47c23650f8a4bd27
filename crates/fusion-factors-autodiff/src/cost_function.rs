//! Automatic-differentiation cost functions.
//!
//! [`AutoDiffCostFunction`] and [`AutoDiffPairCostFunction`] wrap a residual
//! functor and expose it through the object-safe [`CostFunction`] interface.
//! The residual is evaluated with `f64`; requested Jacobians are computed
//! with dual numbers, one block at a time.

use crate::dual::{linearize_pair, linearize_unary, write_row_major};
use fusion_factors_core::cost_function::{CostFunction, PairResidual, UnaryResidual};
use tracing::debug;

/// Cost function over one parameter block.
///
/// # Type Parameters
///
/// - `F`: Residual functor
/// - `R`: Residual dimension
/// - `N0`: Coefficient count of the parameter block
#[derive(Debug, Clone)]
pub struct AutoDiffCostFunction<F, const R: usize, const N0: usize> {
    functor: F,
    sizes: [usize; 1],
}

impl<F, const R: usize, const N0: usize> AutoDiffCostFunction<F, R, N0>
where
    F: UnaryResidual<R, N0>,
{
    /// Wraps a residual functor.
    pub fn new(functor: F) -> Self {
        Self {
            functor,
            sizes: [N0],
        }
    }

    /// The wrapped functor.
    pub fn functor(&self) -> &F {
        &self.functor
    }
}

impl<F, const R: usize, const N0: usize> CostFunction for AutoDiffCostFunction<F, R, N0>
where
    F: UnaryResidual<R, N0>,
{
    fn num_residuals(&self) -> usize {
        R
    }

    fn parameter_block_sizes(&self) -> &[usize] {
        &self.sizes
    }

    fn evaluate(
        &self,
        parameters: &[&[f64]],
        residuals: &mut [f64],
        jacobians: Option<&mut [Option<&mut [f64]>]>,
    ) -> bool {
        if let Err(err) = self.check_layout(parameters, residuals, jacobians.as_deref()) {
            debug!("Rejected evaluation of {:?}: {}", self.functor, err);
            return false;
        }
        let x0: [f64; N0] = std::array::from_fn(|i| parameters[0][i]);

        let jacobian = jacobians.and_then(|j| j[0].as_deref_mut());
        match jacobian {
            None => {
                let mut r = [0.0; R];
                if !self.functor.evaluate(&x0, &mut r) {
                    return false;
                }
                residuals.copy_from_slice(&r);
            }
            Some(out) => {
                let Some((r, j)) = linearize_unary(&self.functor, &x0) else {
                    return false;
                };
                residuals.copy_from_slice(r.as_slice());
                write_row_major(&j, out);
            }
        }
        true
    }
}

/// Cost function over two parameter blocks.
///
/// # Type Parameters
///
/// - `F`: Residual functor
/// - `R`: Residual dimension
/// - `N0`: Coefficient count of the first parameter block
/// - `N1`: Coefficient count of the second parameter block
#[derive(Debug, Clone)]
pub struct AutoDiffPairCostFunction<F, const R: usize, const N0: usize, const N1: usize> {
    functor: F,
    sizes: [usize; 2],
}

impl<F, const R: usize, const N0: usize, const N1: usize> AutoDiffPairCostFunction<F, R, N0, N1>
where
    F: PairResidual<R, N0, N1>,
{
    /// Wraps a residual functor.
    pub fn new(functor: F) -> Self {
        Self {
            functor,
            sizes: [N0, N1],
        }
    }

    /// The wrapped functor.
    pub fn functor(&self) -> &F {
        &self.functor
    }
}

impl<F, const R: usize, const N0: usize, const N1: usize> CostFunction
    for AutoDiffPairCostFunction<F, R, N0, N1>
where
    F: PairResidual<R, N0, N1>,
{
    fn num_residuals(&self) -> usize {
        R
    }

    fn parameter_block_sizes(&self) -> &[usize] {
        &self.sizes
    }

    fn evaluate(
        &self,
        parameters: &[&[f64]],
        residuals: &mut [f64],
        jacobians: Option<&mut [Option<&mut [f64]>]>,
    ) -> bool {
        if let Err(err) = self.check_layout(parameters, residuals, jacobians.as_deref()) {
            debug!("Rejected evaluation of {:?}: {}", self.functor, err);
            return false;
        }
        let x0: [f64; N0] = std::array::from_fn(|i| parameters[0][i]);
        let x1: [f64; N1] = std::array::from_fn(|i| parameters[1][i]);

        let Some(jacobians) = jacobians else {
            let mut r = [0.0; R];
            if !self.functor.evaluate(&x0, &x1, &mut r) {
                return false;
            }
            residuals.copy_from_slice(&r);
            return true;
        };

        let want = [jacobians[0].is_some(), jacobians[1].is_some()];
        let Some((r, j0, j1)) = linearize_pair(&self.functor, &x0, &x1, want) else {
            return false;
        };
        residuals.copy_from_slice(r.as_slice());

        let (first, second) = jacobians.split_at_mut(1);
        if let (Some(out), Some(j)) = (first[0].as_deref_mut(), j0) {
            write_row_major(&j, out);
        }
        if let (Some(out), Some(j)) = (second[0].as_deref_mut(), j1) {
            write_row_major(&j, out);
        }
        true
    }
}
