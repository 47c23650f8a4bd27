//! Per-block Jacobians of residual functors with forward-mode dual numbers.
//!
//! Each parameter block is differentiated separately: its coefficients are
//! seeded as a `DualSVec64<N>` whose derivative part spans exactly that
//! block, and every other block enters the functor as a constant. Block sizes
//! are at most 7, so the dual vectors stay small and live on the stack.

use fusion_factors_core::{
    cost_function::{PairResidual, UnaryResidual},
    types::{lift, zeros, SMatrix, SVector},
};
use num_dual::{jacobian, DualSVec64};
use std::cell::Cell;

/// Residual and Jacobian of a single-block functor at `x0`.
///
/// Returns `None` if the functor reports failure.
pub fn linearize_unary<F, const R: usize, const N0: usize>(
    functor: &F,
    x0: &[f64; N0],
) -> Option<(SVector<f64, R>, SMatrix<f64, R, N0>)>
where
    F: UnaryResidual<R, N0> + ?Sized,
{
    let ok = Cell::new(true);
    let (residual, j) = jacobian(
        |p: SVector<DualSVec64<N0>, N0>| {
            let x: [DualSVec64<N0>; N0] = std::array::from_fn(|i| p[i].clone());
            let mut r = zeros::<DualSVec64<N0>, R>();
            ok.set(functor.evaluate(&x, &mut r));
            SVector::from(r)
        },
        SVector::from(*x0),
    );
    ok.get().then_some((residual, j))
}

/// Residual and both block Jacobians of a two-block functor.
///
/// Either Jacobian can be skipped, which saves one dual pass when the solver
/// holds that block constant.
pub fn linearize_pair<F, const R: usize, const N0: usize, const N1: usize>(
    functor: &F,
    x0: &[f64; N0],
    x1: &[f64; N1],
    want: [bool; 2],
) -> Option<(
    SVector<f64, R>,
    Option<SMatrix<f64, R, N0>>,
    Option<SMatrix<f64, R, N1>>,
)>
where
    F: PairResidual<R, N0, N1> + ?Sized,
{
    let mut r = [0.0; R];
    if !functor.evaluate(x0, x1, &mut r) {
        return None;
    }

    let ok = Cell::new(true);
    let j0 = want[0].then(|| {
        let (_, j) = jacobian(
            |p: SVector<DualSVec64<N0>, N0>| {
                let a: [DualSVec64<N0>; N0] = std::array::from_fn(|i| p[i].clone());
                let b: [DualSVec64<N0>; N1] = std::array::from_fn(|i| lift(x1[i]));
                let mut r = zeros::<DualSVec64<N0>, R>();
                ok.set(ok.get() && functor.evaluate(&a, &b, &mut r));
                SVector::from(r)
            },
            SVector::from(*x0),
        );
        j
    });
    let j1 = want[1].then(|| {
        let (_, j) = jacobian(
            |p: SVector<DualSVec64<N1>, N1>| {
                let a: [DualSVec64<N1>; N0] = std::array::from_fn(|i| lift(x0[i]));
                let b: [DualSVec64<N1>; N1] = std::array::from_fn(|i| p[i].clone());
                let mut r = zeros::<DualSVec64<N1>, R>();
                ok.set(ok.get() && functor.evaluate(&a, &b, &mut r));
                SVector::from(r)
            },
            SVector::from(*x1),
        );
        j
    });

    ok.get().then_some((SVector::from(r), j0, j1))
}

/// Copies a matrix into a row-major buffer of the same size.
pub(crate) fn write_row_major<const R: usize, const C: usize>(
    m: &SMatrix<f64, R, C>,
    out: &mut [f64],
) {
    debug_assert_eq!(out.len(), R * C);
    for row in 0..R {
        for col in 0..C {
            out[row * C + col] = m[(row, col)];
        }
    }
}
