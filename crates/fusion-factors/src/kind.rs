//! Registration metadata for every factor kind.

use fusion_factors_core::types::{ORIENTATION_COEFFS, POSE_COEFFS, SCALAR_COEFFS};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The factor kinds of the catalog.
///
/// Each kind fixes the residual dimension and the coefficient count of every
/// parameter block it reads. The factor types expose the same values as
/// associated constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FactorKind {
    /// Absolute orientation measurement.
    Orientation,
    /// Relative pose between two poses.
    RelativePose,
    /// Distance between two pose translations.
    Range,
    /// Vertical position of a pose.
    Altitude,
    /// Attitude propagated over a free time offset.
    TimeSyncAttitude,
    /// Rotation offset calibration.
    OrientationOffset,
    /// Pose offset calibration.
    PoseOffset,
    /// Pinhole reprojection of a known world point.
    PoseReprojection,
}

impl FactorKind {
    /// Every kind, in declaration order.
    pub const ALL: [FactorKind; 8] = [
        FactorKind::Orientation,
        FactorKind::RelativePose,
        FactorKind::Range,
        FactorKind::Altitude,
        FactorKind::TimeSyncAttitude,
        FactorKind::OrientationOffset,
        FactorKind::PoseOffset,
        FactorKind::PoseReprojection,
    ];

    /// Residual dimension.
    pub const fn residual_dim(self) -> usize {
        match self {
            FactorKind::Orientation
            | FactorKind::TimeSyncAttitude
            | FactorKind::OrientationOffset => 3,
            FactorKind::RelativePose | FactorKind::PoseOffset => 6,
            FactorKind::Range | FactorKind::Altitude => 1,
            FactorKind::PoseReprojection => 2,
        }
    }

    /// Coefficient count of each parameter block, in call order.
    pub const fn parameter_block_sizes(self) -> &'static [usize] {
        match self {
            FactorKind::Orientation | FactorKind::OrientationOffset => &[ORIENTATION_COEFFS],
            FactorKind::RelativePose | FactorKind::Range => &[POSE_COEFFS, POSE_COEFFS],
            FactorKind::Altitude | FactorKind::PoseOffset | FactorKind::PoseReprojection => {
                &[POSE_COEFFS]
            }
            FactorKind::TimeSyncAttitude => &[SCALAR_COEFFS],
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            FactorKind::Orientation => "orientation",
            FactorKind::RelativePose => "relative_pose",
            FactorKind::Range => "range",
            FactorKind::Altitude => "altitude",
            FactorKind::TimeSyncAttitude => "time_sync_attitude",
            FactorKind::OrientationOffset => "orientation_offset",
            FactorKind::PoseOffset => "pose_offset",
            FactorKind::PoseReprojection => "pose_reprojection",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
