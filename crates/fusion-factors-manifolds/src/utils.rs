//! Small linear-algebra helpers shared by the group implementations.

use fusion_factors_core::types::lift;
use nalgebra::{Matrix3, RealField, Vector3};

/// Squared angle below which closed-form expressions switch to Taylor series.
pub(crate) const SMALL_ANGLE_SQ: f64 = 1e-10;

/// Squared angle below which the SO(3) left Jacobian uses its series.
///
/// The closed-form coefficients subtract nearly equal terms, so their error
/// grows like `ε / θ²`. At this threshold the dropped `θ⁶` terms are below
/// `1e-14`.
pub(crate) const LEFT_JACOBIAN_SERIES_SQ: f64 = 1e-3;

/// Skew-symmetric matrix `[v]×` such that `[v]× u = v × u`.
pub fn skew<T: RealField>(v: &Vector3<T>) -> Matrix3<T> {
    let zero = T::zero();
    Matrix3::new(
        zero.clone(),
        -v.z.clone(),
        v.y.clone(),
        v.z.clone(),
        zero.clone(),
        -v.x.clone(),
        -v.y.clone(),
        v.x.clone(),
        zero,
    )
}

/// Left Jacobian of SO(3), `V(ω)`, and its inverse.
///
/// `V` maps the translational tangent component to the translation of
/// `Exp([ρ; ω])`; `V⁻¹` is used by the SE(3) logarithm.
pub(crate) fn left_jacobian_and_inverse<T: RealField>(
    omega: &Vector3<T>,
) -> (Matrix3<T>, Matrix3<T>) {
    let theta_sq = omega.norm_squared();
    let w = skew(omega);
    let w2 = &w * &w;
    let identity = Matrix3::<T>::identity();
    let half = lift::<T>(0.5);

    if theta_sq < lift(LEFT_JACOBIAN_SERIES_SQ) {
        let t2 = theta_sq.clone();
        let t4 = theta_sq.clone() * theta_sq;
        let a = half.clone() - t2.clone() / lift::<T>(24.0) + t4.clone() / lift::<T>(720.0);
        let b = lift::<T>(1.0 / 6.0) - t2.clone() / lift::<T>(120.0)
            + t4.clone() / lift::<T>(5040.0);
        let c = lift::<T>(1.0 / 12.0) + t2 / lift::<T>(720.0) + t4 / lift::<T>(30240.0);

        let v = &identity + &w * a + &w2 * b;
        let v_inv = identity - w * half + w2 * c;
        return (v, v_inv);
    }

    let theta = theta_sq.clone().sqrt();
    let (sin, cos) = (theta.clone().sin(), theta.clone().cos());
    let one_minus_cos = T::one() - cos;

    let a = one_minus_cos.clone() / theta_sq.clone();
    let b = (theta.clone() - sin.clone()) / (theta_sq.clone() * theta.clone());
    let c = (T::one() - theta * sin / (lift::<T>(2.0) * one_minus_cos)) / theta_sq;

    let v = &identity + &w * a + &w2 * b;
    let v_inv = identity - w * half + w2 * c;
    (v, v_inv)
}
