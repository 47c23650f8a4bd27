//! The factor catalog.
//!
//! Every factor is an immutable residual functor generic over the numeric
//! type. Its `create` factory validates the measurement data, inverts the
//! covariance once, and wraps the functor in an automatic-differentiation
//! cost function carrying the factor's registration metadata.
//!
//! # Conventions
//!
//! - Orientation blocks: `[qw, qx, qy, qz]`
//! - Pose blocks: `[tx, ty, tz, qw, qx, qy, qz]`
//! - `a ⊟ b = Log(b⁻¹ ∘ a)`, `a ⊞ δ = a ∘ Exp(δ)`
//!
//! Quaternion coefficients are used as given; nothing here renormalizes a
//! measurement or a parameter block.

pub mod altitude;
pub mod orientation;
pub mod orientation_offset;
pub mod pose_offset;
pub mod range;
pub mod relative_pose;
pub mod reprojection;
pub mod time_sync;

pub use altitude::AltitudeFactor;
pub use orientation::OrientationFactor;
pub use orientation_offset::OrientationOffsetFactor;
pub use pose_offset::PoseOffsetFactor;
pub use range::RangeFactor;
pub use relative_pose::RelativePoseFactor;
pub use reprojection::{PinholeIntrinsics, PoseReprojectionFactor};
pub use time_sync::TimeSyncAttitudeFactor;

use crate::kind::FactorKind;
use fusion_factors_core::types::SVector;
use nalgebra::RealField;
use tracing::debug;

/// Copies a fixed-size vector into a residual buffer.
#[inline]
pub(crate) fn write_residual<T: RealField, const R: usize>(
    value: &SVector<T, R>,
    residual: &mut [T; R],
) {
    residual.clone_from_slice(value.as_slice());
}

pub(crate) fn log_creation(kind: FactorKind) {
    debug!(
        kind = %kind,
        residual_dim = kind.residual_dim(),
        parameter_blocks = ?kind.parameter_block_sizes(),
        "created cost function"
    );
}
