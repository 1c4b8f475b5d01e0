//! Run parameters for the rank estimators.
//!
//! All knobs that the estimators need are carried in a [`RankConfig`] value and
//! handed to them explicitly, so two runs with different settings can coexist
//! in the same process.

use crate::rank::error::{RankError, Result};

/// Probability that the surfer follows a link instead of jumping to a random page.
pub const DAMPING: f64 = 0.85;

/// Number of pages visited by the sampling estimator.
pub const SAMPLES: usize = 10_000;

/// Largest per-page change the iterative estimator accepts as converged.
pub const TOLERANCE: f64 = 0.001;

/// Parameters shared by the sampling and iterative estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    /// Damping factor, strictly between 0 and 1.
    pub damping: f64,
    /// Number of pages in the random walk (including the starting page).
    pub samples: usize,
    /// Convergence threshold of the iterative estimator.
    pub tolerance: f64,
    /// Optional safety bound on the number of iteration rounds.
    /// `None` iterates until convergence, however long that takes.
    pub max_iterations: Option<usize>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            samples: SAMPLES,
            tolerance: TOLERANCE,
            max_iterations: None,
        }
    }
}

impl RankConfig {
    /// Returns a copy with a different damping factor.
    #[must_use]
    pub const fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Returns a copy with a different sample count.
    #[must_use]
    pub const fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Returns a copy with a different convergence tolerance.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns a copy with an iteration cap (or without one, for `None`).
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks every parameter against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: `InvalidDamping`, `ZeroSamples`,
    /// `InvalidTolerance` or `ZeroIterationCap`.
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(RankError::ZeroSamples);
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RankError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == Some(0) {
            return Err(RankError::ZeroIterationCap);
        }
        Ok(())
    }
}

/// Rejects damping factors outside the open interval `(0, 1)`, NaN included.
pub(crate) fn check_damping(damping: f64) -> Result<f64> {
    if damping > 0.0 && damping < 1.0 {
        Ok(damping)
    } else {
        Err(RankError::InvalidDamping(damping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RankConfig::default();
        assert!((config.damping - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.samples, 10_000);
        assert!((config.tolerance - 0.001).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = RankConfig::default()
            .with_damping(0.5)
            .with_samples(42)
            .with_tolerance(1e-6)
            .with_max_iterations(Some(100));
        assert!((config.damping - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.samples, 42);
        assert!((config.tolerance - 1e-6).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, Some(100));
    }

    #[test]
    fn test_damping_bounds_are_exclusive() {
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = RankConfig::default().with_damping(bad).validate();
            assert!(matches!(err, Err(RankError::InvalidDamping(_))), "{bad}");
        }
        assert!(check_damping(0.01).is_ok());
        assert!(check_damping(0.99).is_ok());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let err = RankConfig::default().with_samples(0).validate();
        assert!(matches!(err, Err(RankError::ZeroSamples)));
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        for bad in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let err = RankConfig::default().with_tolerance(bad).validate();
            assert!(matches!(err, Err(RankError::InvalidTolerance(_))), "{bad}");
        }
    }

    #[test]
    fn test_zero_iteration_cap_rejected() {
        let err = RankConfig::default().with_max_iterations(Some(0)).validate();
        assert!(matches!(err, Err(RankError::ZeroIterationCap)));
    }
}
