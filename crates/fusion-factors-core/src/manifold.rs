//! Lie group trait for manifold-valued parameter blocks.
//!
//! Factors never look inside an orientation or pose. They build elements from
//! coefficient buffers and combine them through the operations below, which
//! keeps every residual valid for any numeric type implementing
//! [`RealField`], including dual numbers.
//!
//! # Conventions
//!
//! - **Boxplus**: `x ⊞ δ = x ∘ Exp(δ)`
//! - **Boxminus**: `y ⊟ x = Log(x⁻¹ ∘ y)`, so `x ⊞ (y ⊟ x) = y`
//!
//! Both operators act on the right, so tangent vectors are expressed in the
//! local frame of the element being perturbed.

use nalgebra::RealField;
use std::fmt::Debug;

/// Trait for matrix Lie groups stored as flat coefficient buffers.
///
/// # Type Parameters
///
/// - `T`: The numeric type. The same implementation serves plain `f64`
///   evaluation and derivative-carrying evaluation.
pub trait LieGroup<T: RealField>: Clone + Debug + Sized {
    /// Tangent-space representation (a fixed-size vector of length `DOF`).
    type Tangent: Clone + Debug;

    /// Number of coefficients in the flat buffer representation.
    const NUM_COEFFS: usize;

    /// Degrees of freedom, i.e. the tangent-space dimension.
    const DOF: usize;

    /// Returns the group identity.
    fn identity() -> Self;

    /// Builds an element from a flat coefficient buffer.
    ///
    /// The buffer must hold exactly `NUM_COEFFS` values. Rotation
    /// coefficients are used as given; callers are responsible for
    /// normalization.
    fn from_coeffs(coeffs: &[T]) -> Self;

    /// Writes the flat coefficient buffer into `out`.
    fn write_coeffs(&self, out: &mut [T]);

    /// Group composition `self ∘ other`.
    fn compose(&self, other: &Self) -> Self;

    /// Group inverse.
    fn inverse(&self) -> Self;

    /// Exponential map from the tangent space at identity.
    fn exp(tangent: &Self::Tangent) -> Self;

    /// Logarithm map to the tangent space at identity.
    fn log(&self) -> Self::Tangent;

    /// Boxplus: `self ∘ Exp(delta)`.
    fn plus(&self, delta: &Self::Tangent) -> Self {
        self.compose(&Self::exp(delta))
    }

    /// Boxminus: `Log(other⁻¹ ∘ self)`.
    fn minus(&self, other: &Self) -> Self::Tangent {
        other.inverse().compose(self).log()
    }

    /// Returns the coefficient buffer as an owned vector.
    fn to_coeffs(&self) -> Vec<T> {
        let mut out = vec![T::zero(); Self::NUM_COEFFS];
        self.write_coeffs(&mut out);
        out
    }
}
