//! Residual functor and cost function interfaces.
//!
//! Two layers meet here:
//!
//! - **Residual functors** ([`UnaryResidual`], [`PairResidual`]) are the
//!   factor definitions. They are generic over the numeric type `T`, read one
//!   or two fixed-size parameter blocks, and write a fixed-size residual. The
//!   dimensions are const generics, so a functor cannot read more
//!   coefficients than it declares.
//! - **Cost functions** ([`CostFunction`]) are the object-safe, `f64`-only
//!   view a solver registers. They carry the residual dimension and
//!   parameter-block sizes as metadata and fill Jacobian buffers on request.
//!
//! The automatic-differentiation adapters that bridge the two live in the
//! `fusion-factors-autodiff` crate.
//!
//! # Buffer Layout
//!
//! Jacobians are row-major `num_residuals x block_size` buffers, one per
//! parameter block, taken with respect to the raw coefficients of the block.

use crate::{
    error::{FactorError, Result},
    types::{zeros, SVector},
};
use nalgebra::{DMatrix, DVector, RealField};
use std::fmt::Debug;

/// A residual reading a single parameter block.
///
/// # Type Parameters
///
/// - `R`: Residual dimension
/// - `N0`: Coefficient count of the parameter block
pub trait UnaryResidual<const R: usize, const N0: usize>: Debug + Send + Sync {
    /// Evaluates the residual.
    ///
    /// Returns `false` if the residual cannot be computed; the contents of
    /// `residual` are then unspecified.
    fn evaluate<T: RealField>(&self, x0: &[T; N0], residual: &mut [T; R]) -> bool;

    /// Evaluates the residual into a freshly allocated vector.
    fn residual<T: RealField>(&self, x0: &[T; N0]) -> Option<SVector<T, R>> {
        let mut residual = zeros::<T, R>();
        self.evaluate(x0, &mut residual)
            .then(|| SVector::<T, R>::from_column_slice(&residual))
    }
}

/// A residual reading two parameter blocks.
///
/// # Type Parameters
///
/// - `R`: Residual dimension
/// - `N0`: Coefficient count of the first parameter block
/// - `N1`: Coefficient count of the second parameter block
pub trait PairResidual<const R: usize, const N0: usize, const N1: usize>:
    Debug + Send + Sync
{
    /// Evaluates the residual.
    fn evaluate<T: RealField>(&self, x0: &[T; N0], x1: &[T; N1], residual: &mut [T; R])
        -> bool;

    /// Evaluates the residual into a freshly allocated vector.
    fn residual<T: RealField>(&self, x0: &[T; N0], x1: &[T; N1]) -> Option<SVector<T, R>> {
        let mut residual = zeros::<T, R>();
        self.evaluate(x0, x1, &mut residual)
            .then(|| SVector::<T, R>::from_column_slice(&residual))
    }
}

/// Object-safe cost function registered with a solver.
///
/// Implementations must be immutable after construction: `evaluate` takes
/// `&self`, and concurrent calls with distinct output buffers are allowed.
pub trait CostFunction: Debug + Send + Sync {
    /// Residual dimension.
    fn num_residuals(&self) -> usize;

    /// Coefficient count of each parameter block, in call order.
    fn parameter_block_sizes(&self) -> &[usize];

    /// Evaluates residuals and, optionally, Jacobians.
    ///
    /// # Arguments
    ///
    /// * `parameters` - One coefficient buffer per parameter block
    /// * `residuals` - Output buffer of length `num_residuals()`
    /// * `jacobians` - Optional per-block output buffers; a `None` entry skips
    ///   that block (e.g. a block held constant by the solver)
    ///
    /// # Returns
    ///
    /// `true` on success. `false` if a buffer length disagrees with the
    /// declared metadata or the residual functor reported failure.
    fn evaluate(
        &self,
        parameters: &[&[f64]],
        residuals: &mut [f64],
        jacobians: Option<&mut [Option<&mut [f64]>]>,
    ) -> bool;

    /// Checks buffer lengths against the declared metadata.
    fn check_layout(
        &self,
        parameters: &[&[f64]],
        residuals: &[f64],
        jacobians: Option<&[Option<&mut [f64]>]>,
    ) -> Result<()> {
        let sizes = self.parameter_block_sizes();
        if parameters.len() != sizes.len() {
            return Err(FactorError::dimension_mismatch(
                format!("{} parameter blocks", sizes.len()),
                format!("{} parameter blocks", parameters.len()),
            ));
        }
        for (index, (block, &size)) in parameters.iter().zip(sizes).enumerate() {
            if block.len() != size {
                return Err(FactorError::dimension_mismatch(
                    format!("block {index} of size {size}"),
                    format!("block {index} of size {}", block.len()),
                ));
            }
        }
        if residuals.len() != self.num_residuals() {
            return Err(FactorError::dimension_mismatch(
                format!("{} residuals", self.num_residuals()),
                format!("{} residuals", residuals.len()),
            ));
        }
        if let Some(jacobians) = jacobians {
            if jacobians.len() != sizes.len() {
                return Err(FactorError::dimension_mismatch(
                    format!("{} jacobian blocks", sizes.len()),
                    format!("{} jacobian blocks", jacobians.len()),
                ));
            }
            for (index, (jacobian, &size)) in jacobians.iter().zip(sizes).enumerate() {
                if let Some(jacobian) = jacobian {
                    let expected = self.num_residuals() * size;
                    if jacobian.len() != expected {
                        return Err(FactorError::dimension_mismatch(
                            format!("jacobian {index} of length {expected}"),
                            format!("jacobian {index} of length {}", jacobian.len()),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates the residual vector, reporting failures as errors.
    fn residuals(&self, parameters: &[&[f64]]) -> Result<DVector<f64>> {
        let mut residuals = DVector::zeros(self.num_residuals());
        self.check_layout(parameters, residuals.as_slice(), None)?;
        if self.evaluate(parameters, residuals.as_mut_slice(), None) {
            Ok(residuals)
        } else {
            Err(FactorError::evaluation_failed("residual evaluation returned false"))
        }
    }

    /// Evaluates the residual vector and one Jacobian matrix per block.
    fn linearize(&self, parameters: &[&[f64]]) -> Result<(DVector<f64>, Vec<DMatrix<f64>>)> {
        let rows = self.num_residuals();
        let sizes = self.parameter_block_sizes().to_vec();
        let mut residuals = DVector::zeros(rows);
        let mut buffers: Vec<Vec<f64>> = sizes.iter().map(|&size| vec![0.0; rows * size]).collect();

        self.check_layout(parameters, residuals.as_slice(), None)?;
        let ok = {
            let mut jacobians: Vec<Option<&mut [f64]>> = buffers
                .iter_mut()
                .map(|buffer| Some(buffer.as_mut_slice()))
                .collect();
            self.evaluate(
                parameters,
                residuals.as_mut_slice(),
                Some(jacobians.as_mut_slice()),
            )
        };
        if !ok {
            return Err(FactorError::evaluation_failed(
                "jacobian evaluation returned false",
            ));
        }

        let jacobians = buffers
            .iter()
            .zip(&sizes)
            .map(|(buffer, &size)| DMatrix::from_row_slice(rows, size, buffer))
            .collect();
        Ok((residuals, jacobians))
    }
}

impl<C: CostFunction + ?Sized> CostFunction for Box<C> {
    fn num_residuals(&self) -> usize {
        (**self).num_residuals()
    }

    fn parameter_block_sizes(&self) -> &[usize] {
        (**self).parameter_block_sizes()
    }

    fn evaluate(
        &self,
        parameters: &[&[f64]],
        residuals: &mut [f64],
        jacobians: Option<&mut [Option<&mut [f64]>]>,
    ) -> bool {
        (**self).evaluate(parameters, residuals, jacobians)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    /// r = [x0 - 1, 2 * x1]
    #[derive(Debug)]
    struct Shift;

    impl UnaryResidual<2, 2> for Shift {
        fn evaluate<T: RealField>(&self, x0: &[T; 2], residual: &mut [T; 2]) -> bool {
            residual[0] = x0[0].clone() - T::one();
            residual[1] = x0[1].clone() * (T::one() + T::one());
            true
        }
    }

    /// Hand-written cost function wrapping [`Shift`].
    #[derive(Debug)]
    struct ShiftCost {
        sizes: [usize; 1],
    }

    impl CostFunction for ShiftCost {
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
            let x = [parameters[0][0], parameters[0][1]];
            let mut r = [0.0; 2];
            if !Shift.evaluate(&x, &mut r) {
                return false;
            }
            residuals.copy_from_slice(&r);
            if let Some(jacobians) = jacobians {
                if let Some(j) = jacobians[0].as_deref_mut() {
                    j.copy_from_slice(&[1.0, 0.0, 0.0, 2.0]);
                }
            }
            true
        }
    }

    #[test]
    fn test_residual_helper() {
        let r = Shift.residual(&[3.0_f64, 0.5]).unwrap();
        assert_eq!(r, Vector2::new(2.0, 1.0));
    }

    #[test]
    fn test_linearize() {
        let cost = ShiftCost { sizes: [2] };
        let (r, j) = cost.linearize(&[&[1.0, 1.0]]).unwrap();
        assert_eq!(r.as_slice(), &[0.0, 2.0]);
        assert_eq!(j.len(), 1);
        assert_eq!(j[0], DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 2.0]));
    }

    #[test]
    fn test_layout_mismatch() {
        let cost = ShiftCost { sizes: [2] };
        let err = cost.residuals(&[&[1.0, 1.0, 1.0]]).unwrap_err();
        assert!(matches!(err, FactorError::DimensionMismatch { .. }));

        let err = cost.residuals(&[&[1.0, 1.0], &[1.0]]).unwrap_err();
        assert!(matches!(err, FactorError::DimensionMismatch { .. }));

        assert!(cost.check_layout(&[&[1.0, 1.0]], &[0.0; 3], None).is_err());
    }

    #[test]
    fn test_boxed_cost_function() {
        let cost: Box<dyn CostFunction> = Box::new(ShiftCost { sizes: [2] });
        assert_eq!(cost.num_residuals(), 2);
        assert_eq!(cost.parameter_block_sizes(), &[2]);
        assert_eq!(cost.residuals(&[&[2.0, 0.0]]).unwrap().as_slice(), &[1.0, 0.0]);
    }
}
