//! Pinhole reprojection of a known world point.

use super::{log_creation, write_residual};
use crate::kind::FactorKind;
use fusion_factors_autodiff::AutoDiffCostFunction;
use fusion_factors_core::{
    cost_function::{CostFunction, UnaryResidual},
    error::FactorError,
    manifold::LieGroup,
    types::{lift, lift_vector, POSE_COEFFS},
    Result,
};
use fusion_factors_manifolds::SE3;
use nalgebra::{RealField, Vector2, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pinhole camera intrinsics without distortion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinholeIntrinsics {
    /// Focal length along x, in pixels
    pub fx: f64,
    /// Focal length along y, in pixels
    pub fy: f64,
    /// Principal point x coordinate
    pub cx: f64,
    /// Principal point y coordinate
    pub cy: f64,
}

impl PinholeIntrinsics {
    /// Creates validated intrinsics.
    ///
    /// # Errors
    ///
    /// Returns [`FactorError::InvalidIntrinsics`] if any value is not finite
    /// or a focal length is zero.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self> {
        if ![fx, fy, cx, cy].iter().all(|v| v.is_finite()) {
            return Err(FactorError::invalid_intrinsics(format!(
                "non-finite intrinsics fx={fx}, fy={fy}, cx={cx}, cy={cy}"
            )));
        }
        if fx == 0.0 || fy == 0.0 {
            return Err(FactorError::invalid_intrinsics(format!(
                "zero focal length fx={fx}, fy={fy}"
            )));
        }
        Ok(Self { fx, fy, cx, cy })
    }

    /// Projects a point given in the camera frame.
    ///
    /// Points at or behind the image plane are not rejected; the division by
    /// depth propagates infinities or NaN.
    pub fn project<T: RealField>(&self, point: &Vector3<T>) -> Vector2<T> {
        let z = point.z.clone();
        Vector2::new(
            lift::<T>(self.fx) * point.x.clone() / z.clone() + lift::<T>(self.cx),
            lift::<T>(self.fy) * point.y.clone() / z + lift::<T>(self.cy),
        )
    }
}

/// Image observation of a surveyed world point, constraining the camera
/// pose `H` (camera-to-world):
///
/// ```text
/// r = uv − π(K, H⁻¹ p_w)
/// ```
///
/// The intrinsics are taken as exact, so the residual is not weighted.
#[derive(Debug, Clone)]
pub struct PoseReprojectionFactor {
    intrinsics: PinholeIntrinsics,
    observed: Vector2<f64>,
    world_point: Vector3<f64>,
}

impl PoseReprojectionFactor {
    /// Registration kind.
    pub const KIND: FactorKind = FactorKind::PoseReprojection;
    /// Residual dimension.
    pub const RESIDUAL_DIM: usize = 2;
    /// One camera pose block.
    pub const PARAMETER_BLOCK_SIZES: [usize; 1] = [POSE_COEFFS];

    /// Creates the factor from validated intrinsics.
    pub fn new(
        intrinsics: PinholeIntrinsics,
        observed: Vector2<f64>,
        world_point: Vector3<f64>,
    ) -> Self {
        Self {
            intrinsics,
            observed,
            world_point,
        }
    }

    /// Builds the cost function for one camera pose block.
    ///
    /// # Errors
    ///
    /// Returns an error if the intrinsics are invalid.
    pub fn create(
        fx: f64,
        fy: f64,
        cx: f64,
        cy: f64,
        observed: Vector2<f64>,
        world_point: Vector3<f64>,
    ) -> Result<Box<dyn CostFunction>> {
        let intrinsics = PinholeIntrinsics::new(fx, fy, cx, cy)?;
        let factor = Self::new(intrinsics, observed, world_point);
        log_creation(Self::KIND);
        Ok(Box::new(AutoDiffCostFunction::<_, 2, POSE_COEFFS>::new(
            factor,
        )))
    }

    /// Camera intrinsics.
    pub fn intrinsics(&self) -> &PinholeIntrinsics {
        &self.intrinsics
    }

    /// Observed pixel.
    pub fn observed(&self) -> &Vector2<f64> {
        &self.observed
    }

    /// Landmark position in the world frame.
    pub fn world_point(&self) -> &Vector3<f64> {
        &self.world_point
    }
}

impl UnaryResidual<2, POSE_COEFFS> for PoseReprojectionFactor {
    fn evaluate<T: RealField>(&self, pose: &[T; POSE_COEFFS], residual: &mut [T; 2]) -> bool {
        let camera_from_world = SE3::from_coeffs(pose).inverse();
        let point = camera_from_world.transform_point(&lift_vector(&self.world_point));
        let error = lift_vector::<T, 2>(&self.observed) - self.intrinsics.project(&point);
        write_residual(&error, residual);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fusion_factors_manifolds::SO3;

    fn intrinsics() -> PinholeIntrinsics {
        PinholeIntrinsics::new(500.0, 480.0, 320.0, 240.0).unwrap()
    }

    #[test]
    fn test_point_on_optical_axis() {
        let factor = PoseReprojectionFactor::new(
            intrinsics(),
            Vector2::new(320.0, 240.0),
            Vector3::new(0.0, 0.0, 5.0),
        );
        let pose = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        assert_eq!(factor.residual(&pose).unwrap(), Vector2::zeros());
    }

    #[test]
    fn test_moved_camera() {
        // Camera one metre to the right and turned to look along world x.
        let turn = SO3::from_axis_angle(&Vector3::y(), std::f64::consts::FRAC_PI_2);
        let camera = SE3::new(turn, Vector3::new(1.0, 0.0, 0.0));
        let world_point = camera.transform_point(&Vector3::new(0.2, -0.1, 4.0));
        let observed = intrinsics().project(&Vector3::new(0.2, -0.1, 4.0));

        let factor = PoseReprojectionFactor::new(intrinsics(), observed, world_point);
        let coeffs: [f64; 7] = camera.coeffs().into();
        assert_relative_eq!(factor.residual(&coeffs).unwrap(), Vector2::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn test_point_on_image_plane_is_not_finite() {
        let factor = PoseReprojectionFactor::new(
            intrinsics(),
            Vector2::new(320.0, 240.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let r = factor.residual(&[0.0_f64, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(!r[0].is_finite());
    }

    #[test]
    fn test_invalid_intrinsics() {
        assert!(PinholeIntrinsics::new(0.0, 1.0, 0.0, 0.0).is_err());
        assert!(PinholeIntrinsics::new(1.0, f64::INFINITY, 0.0, 0.0).is_err());
        let err = PoseReprojectionFactor::create(
            1.0,
            1.0,
            f64::NAN,
            0.0,
            Vector2::zeros(),
            Vector3::z(),
        )
        .unwrap_err();
        assert!(matches!(err, FactorError::InvalidIntrinsics { .. }));
    }
}
