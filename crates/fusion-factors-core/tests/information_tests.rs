//! Property tests for information-matrix preparation.

use approx::assert_relative_eq;
use fusion_factors_core::prelude::*;
use nalgebra::{Matrix3, Vector3};
use proptest::prelude::*;

fn spd3() -> impl Strategy<Value = Matrix3<f64>> {
    (prop::array::uniform9(-1.0..1.0f64), 0.05..2.0f64).prop_map(|(entries, shift)| {
        let a = Matrix3::from_row_slice(&entries);
        a * a.transpose() + Matrix3::identity() * shift
    })
}

proptest! {
    #[test]
    fn spd_covariance_is_inverted(cov in spd3()) {
        let info = InformationMatrix::<3>::from_covariance(&cov).unwrap();
        let product = info.matrix() * cov;
        prop_assert!((product - Matrix3::identity()).amax() < 1e-8);
        prop_assert_eq!(info.matrix(), &info.matrix().transpose());
    }

    #[test]
    fn weighting_is_linear(cov in spd3(), x in prop::array::uniform3(-5.0..5.0f64)) {
        let info = InformationMatrix::<3>::from_covariance(&cov).unwrap();
        let e = Vector3::from(x);
        let w1 = info.weight(&e);
        let w2 = info.weight(&(e * 2.0));
        prop_assert!((w2 - w1 * 2.0).amax() < 1e-9 * (1.0 + w1.amax()));
    }

    #[test]
    fn positive_variance_is_inverted(variance in 1e-6..1e6f64) {
        let info = ScalarInformation::from_variance(variance).unwrap();
        prop_assert!((info.value() * variance - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_rank_deficient_covariance_rejected() {
    let v = Vector3::new(1.0, 2.0, 3.0);
    let cov = v * v.transpose();
    let err = InformationMatrix::<3>::from_covariance(&cov).unwrap_err();
    assert!(matches!(err, FactorError::SingularCovariance { .. }));
}

#[test]
fn test_scaling_covariance_scales_information() {
    let cov = Matrix3::new(0.4, 0.1, 0.0, 0.1, 0.5, 0.05, 0.0, 0.05, 0.3);
    let a = InformationMatrix::<3>::from_covariance(&cov).unwrap();
    let b = InformationMatrix::<3>::from_covariance(&(cov * 0.5)).unwrap();
    assert_relative_eq!(*b.matrix(), a.matrix() * 2.0, epsilon = 1e-10);
}
