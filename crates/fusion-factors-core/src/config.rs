//! Configuration for information-matrix preparation and derivative checks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds applied when a covariance is turned into an information matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InformationConfig {
    /// Largest accepted difference between mirrored entries, relative to the
    /// largest absolute entry of the covariance.
    pub symmetry_tolerance: f64,
    /// Smallest accepted ratio between the smallest and largest singular
    /// values of the covariance.
    pub min_reciprocal_condition: f64,
}

impl Default for InformationConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: 1e-9,
            min_reciprocal_condition: 1e-12,
        }
    }
}

impl InformationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the symmetry tolerance.
    pub fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }

    /// Sets the minimum reciprocal condition number.
    pub fn with_min_reciprocal_condition(mut self, rcond: f64) -> Self {
        self.min_reciprocal_condition = rcond;
        self
    }
}

/// Settings for comparing Jacobians against central finite differences.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivativeCheckConfig {
    /// Base step size; the actual step is scaled by `max(1, |x_i|)`.
    pub step_size: f64,
    /// Tolerance on `|J - J_fd| / max(1, |J|, |J_fd|)`.
    pub relative_tolerance: f64,
}

impl Default for DerivativeCheckConfig {
    fn default() -> Self {
        Self {
            step_size: 1e-6,
            relative_tolerance: 1e-6,
        }
    }
}

impl DerivativeCheckConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the finite-difference step size.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the relative tolerance.
    pub fn with_relative_tolerance(mut self, tolerance: f64) -> Self {
        self.relative_tolerance = tolerance;
        self
    }
}
