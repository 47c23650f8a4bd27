//! Numerical validation of cost-function Jacobians.
//!
//! The checker perturbs every coefficient of every parameter block, evaluates
//! the residual on both sides, and compares the central finite difference
//! against the Jacobian the cost function reports. It works on the raw
//! coefficient buffers, exactly as a solver sees them.

use crate::{
    config::DerivativeCheckConfig,
    cost_function::CostFunction,
    error::{FactorError, Result},
};
use nalgebra::DMatrix;

/// Comparison result for one parameter block.
#[derive(Debug, Clone)]
pub struct BlockCheck {
    /// Jacobian reported by the cost function
    pub analytic: DMatrix<f64>,
    /// Central finite-difference Jacobian
    pub numeric: DMatrix<f64>,
    /// Largest absolute entry-wise difference
    pub max_abs_error: f64,
    /// Largest difference scaled by `max(1, |analytic|, |numeric|)`
    pub max_relative_error: f64,
}

/// Results from a derivative check.
#[derive(Debug, Clone)]
pub struct DerivativeCheckReport {
    /// One entry per parameter block
    pub blocks: Vec<BlockCheck>,
    /// Whether every block is within tolerance
    pub passed: bool,
}

impl DerivativeCheckReport {
    /// Largest relative error across all blocks.
    pub fn max_relative_error(&self) -> f64 {
        self.blocks
            .iter()
            .map(|b| b.max_relative_error)
            .fold(0.0, f64::max)
    }
}

/// Finite-difference checker for [`CostFunction`] Jacobians.
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Compares reported Jacobians with central finite differences.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter layout does not match the cost
    /// function's metadata or if any evaluation fails.
    pub fn check(
        cost: &dyn CostFunction,
        parameters: &[&[f64]],
        config: &DerivativeCheckConfig,
    ) -> Result<DerivativeCheckReport> {
        let (_, analytic) = cost.linearize(parameters)?;
        let rows = cost.num_residuals();

        let mut owned: Vec<Vec<f64>> = parameters.iter().map(|block| block.to_vec()).collect();
        let mut blocks = Vec::with_capacity(owned.len());
        let mut r_plus = vec![0.0; rows];
        let mut r_minus = vec![0.0; rows];

        for (block, analytic) in analytic.into_iter().enumerate() {
            let cols = owned[block].len();
            let mut numeric = DMatrix::zeros(rows, cols);

            for col in 0..cols {
                let original = owned[block][col];
                let h = config.step_size * original.abs().max(1.0);

                owned[block][col] = original + h;
                Self::evaluate_owned(cost, &owned, &mut r_plus)?;
                owned[block][col] = original - h;
                Self::evaluate_owned(cost, &owned, &mut r_minus)?;
                owned[block][col] = original;

                for row in 0..rows {
                    numeric[(row, col)] = (r_plus[row] - r_minus[row]) / (2.0 * h);
                }
            }

            let mut max_abs_error: f64 = 0.0;
            let mut max_relative_error: f64 = 0.0;
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                let err = (a - n).abs();
                let scale = 1.0_f64.max(a.abs()).max(n.abs());
                max_abs_error = max_abs_error.max(err);
                max_relative_error = max_relative_error.max(err / scale);
            }

            blocks.push(BlockCheck {
                analytic,
                numeric,
                max_abs_error,
                max_relative_error,
            });
        }

        let passed = blocks
            .iter()
            .all(|b| b.max_relative_error <= config.relative_tolerance);
        Ok(DerivativeCheckReport { blocks, passed })
    }

    fn evaluate_owned(cost: &dyn CostFunction, owned: &[Vec<f64>], out: &mut [f64]) -> Result<()> {
        let views: Vec<&[f64]> = owned.iter().map(|block| block.as_slice()).collect();
        if cost.evaluate(&views, out, None) {
            Ok(())
        } else {
            Err(FactorError::evaluation_failed(
                "residual evaluation failed during finite differencing",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// r = [x^2, x * y] with a deliberately wrong d/dy when `broken` is set.
    #[derive(Debug)]
    struct Polynomial {
        sizes: [usize; 2],
        broken: bool,
    }

    impl CostFunction for Polynomial {
        fn num_residuals(&self) -> usize {
            2
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
            let x = parameters[0][0];
            let y = parameters[1][0];
            residuals[0] = x * x;
            residuals[1] = x * y;
            if let Some(jacobians) = jacobians {
                if let Some(j) = jacobians[0].as_deref_mut() {
                    j[0] = 2.0 * x;
                    j[1] = y;
                }
                if let Some(j) = jacobians[1].as_deref_mut() {
                    j[0] = 0.0;
                    j[1] = if self.broken { 2.0 * x } else { x };
                }
            }
            true
        }
    }

    #[test]
    fn test_correct_jacobian_passes() {
        let cost = Polynomial {
            sizes: [1, 1],
            broken: false,
        };
        let report =
            DerivativeChecker::check(&cost, &[&[1.5], &[-2.0]], &DerivativeCheckConfig::default())
                .unwrap();
        assert!(report.passed);
        assert!(report.max_relative_error() < 1e-8);
        assert_eq!(report.blocks.len(), 2);
    }

    #[test]
    fn test_wrong_jacobian_fails() {
        let cost = Polynomial {
            sizes: [1, 1],
            broken: true,
        };
        let report =
            DerivativeChecker::check(&cost, &[&[1.5], &[-2.0]], &DerivativeCheckConfig::default())
                .unwrap();
        assert!(!report.passed);
        assert!(report.blocks[1].max_abs_error > 1.0);
    }

    #[test]
    fn test_layout_error_propagates() {
        let cost = Polynomial {
            sizes: [1, 1],
            broken: false,
        };
        assert!(
            DerivativeChecker::check(&cost, &[&[1.5]], &DerivativeCheckConfig::default()).is_err()
        );
    }
}
