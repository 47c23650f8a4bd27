//! Dual-number Jacobians through the Lie group operations.
//!
//! These tests run the SO(3)/SE(3) code paths with dual numbers and compare
//! the resulting Jacobians with central finite differences.

use fusion_factors_autodiff::{AutoDiffCostFunction, AutoDiffPairCostFunction};
use fusion_factors_core::prelude::*;
use fusion_factors_manifolds::{SE3, SO3};
use nalgebra::{RealField, Vector3};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Rotates a fixed point: r = R(q) p.
#[derive(Debug)]
struct RotatePoint {
    point: Vector3<f64>,
}

impl UnaryResidual<3, 4> for RotatePoint {
    fn evaluate<T: RealField>(&self, q: &[T; 4], r: &mut [T; 3]) -> bool {
        let rotated = SO3::from_coeffs(q).rotate(&lift_vector(&self.point));
        r.clone_from_slice(rotated.as_slice());
        true
    }
}

/// Tangent-space difference of two poses: r = Xj ⊟ Xi.
#[derive(Debug)]
struct PoseDifference;

impl PairResidual<6, 7, 7> for PoseDifference {
    fn evaluate<T: RealField>(&self, xi: &[T; 7], xj: &[T; 7], r: &mut [T; 6]) -> bool {
        let delta = SE3::from_coeffs(xj).minus(&SE3::from_coeffs(xi));
        r.clone_from_slice(delta.as_slice());
        true
    }
}

/// Round trip through the exponential map: r = Log(Exp(ξ)), whose Jacobian
/// is the identity.
#[derive(Debug)]
struct ExpLogRoundTrip;

impl UnaryResidual<6, 6> for ExpLogRoundTrip {
    fn evaluate<T: RealField>(&self, xi: &[T; 6], r: &mut [T; 6]) -> bool {
        let tangent = Vector6::from_column_slice(xi);
        let back = SE3::exp(&tangent).log();
        r.clone_from_slice(back.as_slice());
        true
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rotate_point_jacobian_matches_finite_differences(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let cost = AutoDiffCostFunction::new(RotatePoint {
            point: Vector3::new(0.3, -1.2, 2.0),
        });
        let q = SO3::random(&mut rng).to_coeffs();
        let report = DerivativeChecker::check(&cost, &[q.as_slice()], &DerivativeCheckConfig::default())
            .unwrap();
        prop_assert!(report.passed, "max relative error {}", report.max_relative_error());
    }

    #[test]
    fn pose_difference_jacobians_match_finite_differences(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let cost = AutoDiffPairCostFunction::new(PoseDifference);
        let xi = SE3::random(&mut rng, 3.0);
        let xj = xi.plus(&Vector6::new(0.3, -0.1, 0.2, 0.4, 0.1, -0.3));
        let (xi, xj) = (xi.to_coeffs(), xj.to_coeffs());
        let report = DerivativeChecker::check(
            &cost,
            &[xi.as_slice(), xj.as_slice()],
            &DerivativeCheckConfig::default().with_relative_tolerance(1e-5),
        )
        .unwrap();
        prop_assert!(report.passed, "max relative error {}", report.max_relative_error());
    }
}

#[test]
fn test_jacobian_at_identity_is_finite() {
    let cost = AutoDiffPairCostFunction::new(PoseDifference);
    let id = SE3::<f64>::identity().to_coeffs();
    let (r, j) = cost.linearize(&[id.as_slice(), id.as_slice()]).unwrap();
    assert!(r.iter().all(|v| *v == 0.0));
    assert!(j.iter().all(|m| m.iter().all(|v| v.is_finite())));
}

#[test]
fn test_exp_log_jacobian_is_identity_at_small_angles() {
    let cost = AutoDiffCostFunction::new(ExpLogRoundTrip);
    let axis = Vector3::new(2.0, -1.0, 2.0) / 3.0;
    for theta in [1e-6, 2e-5, 1e-4, 1e-3, 0.05] {
        let xi = [0.4, -1.3, 0.8, axis.x * theta, axis.y * theta, axis.z * theta];
        let (r, j) = cost.linearize(&[xi.as_slice()]).unwrap();
        for (value, expected) in r.iter().zip(xi) {
            assert!((value - expected).abs() < 1e-12, "theta {theta}: {value} vs {expected}");
        }
        let deviation = (&j[0] - nalgebra::DMatrix::<f64>::identity(6, 6)).amax();
        assert!(deviation < 1e-9, "theta {theta}: jacobian off by {deviation}");
    }
}

#[test]
fn test_pose_difference_passes_derivative_check_at_small_angles() {
    let cost = AutoDiffPairCostFunction::new(PoseDifference);
    let xi = SE3::new(
        SO3::from_axis_angle(&Vector3::new(0.0, 0.6, 0.8), 0.9),
        Vector3::new(1.0, -2.0, 0.5),
    );
    for theta in [2e-5, 3e-5, 1e-4, 1e-3] {
        let xj = xi.plus(&Vector6::new(0.2, 0.1, -0.3, theta, 0.0, 0.0));
        let (a, b) = (xi.to_coeffs(), xj.to_coeffs());
        let report = DerivativeChecker::check(
            &cost,
            &[a.as_slice(), b.as_slice()],
            &DerivativeCheckConfig::default().with_relative_tolerance(1e-5),
        )
        .unwrap();
        assert!(
            report.passed,
            "theta {theta}: max relative error {}",
            report.max_relative_error()
        );
    }
}
