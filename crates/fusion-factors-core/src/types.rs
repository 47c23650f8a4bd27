//! Type definitions and aliases for residual factors.
//!
//! This module provides the fixed-size vector and matrix aliases used by the
//! factor catalog, the coefficient-buffer sizes of each parameter-block kind,
//! and helpers that cast construction-time `f64` data into the numeric type a
//! residual is evaluated with.

use nalgebra::{Const, OMatrix, OVector, RealField};

/// Number of coefficients in an orientation block `[qw, qx, qy, qz]`.
pub const ORIENTATION_COEFFS: usize = 4;

/// Number of coefficients in a pose block `[tx, ty, tz, qw, qx, qy, qz]`.
pub const POSE_COEFFS: usize = 7;

/// Number of coefficients in a free scalar block.
pub const SCALAR_COEFFS: usize = 1;

/// Type alias for a statically-sized vector.
pub type SVector<T, const N: usize> = OVector<T, Const<N>>;

/// Type alias for a statically-sized matrix.
pub type SMatrix<T, const R: usize, const C: usize> = OMatrix<T, Const<R>, Const<C>>;

/// Type alias for a square matrix with static size.
pub type SSquareMatrix<T, const N: usize> = OMatrix<T, Const<N>, Const<N>>;

/// Flat coefficient buffer of a pose block.
pub type Vector7<T> = SVector<T, POSE_COEFFS>;

/// SE(3) tangent vector `[ρ; ω]`.
pub type Vector6<T> = SVector<T, 6>;

/// 6x6 matrix, e.g. a pose covariance.
pub type Matrix6<T> = SSquareMatrix<T, 6>;

/// Converts an `f64` constant into the evaluation numeric type.
#[inline]
pub fn lift<T: RealField>(value: f64) -> T {
    nalgebra::convert(value)
}

/// Converts an `f64` vector into the evaluation numeric type.
#[inline]
pub fn lift_vector<T: RealField, const N: usize>(value: &SVector<f64, N>) -> SVector<T, N> {
    value.map(lift::<T>)
}

/// Converts an `f64` matrix into the evaluation numeric type.
#[inline]
pub fn lift_matrix<T: RealField, const R: usize, const C: usize>(
    value: &SMatrix<f64, R, C>,
) -> SMatrix<T, R, C> {
    value.map(lift::<T>)
}

/// Array filled with the additive identity of `T`.
#[inline]
pub fn zeros<T: RealField, const N: usize>() -> [T; N] {
    std::array::from_fn(|_| T::zero())
}
