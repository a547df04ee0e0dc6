//! Evaluator configuration.

use crate::error::AspectError;
use serde::{Deserialize, Serialize};

/// Reference forward step for the orb derivative (days).
pub const DEFAULT_TIME_STEP_DAYS: f64 = 0.1;
/// Typical orb a caller allows before an aspect is considered at all.
pub const DEFAULT_ORB_FILTER_DEG: f64 = 8.0;

/// Read-only settings shared by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Forward projection step. Must stay small relative to how fast the
    /// separation moves; this is a derivative estimate, not a forecast.
    pub time_step_days: f64,
    /// Default orb used by chart scans when an aspect has no override.
    pub orb_filter_deg: f64,
}

impl EvaluatorConfig {
    pub fn new(time_step_days: f64, orb_filter_deg: f64) -> Result<Self, AspectError> {
        let config = Self {
            time_step_days,
            orb_filter_deg,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AspectError> {
        if !self.time_step_days.is_finite() || self.time_step_days <= 0.0 {
            return Err(AspectError::InvalidTimeStep {
                days: self.time_step_days,
            });
        }
        validate_orb(self.orb_filter_deg)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            time_step_days: DEFAULT_TIME_STEP_DAYS,
            orb_filter_deg: DEFAULT_ORB_FILTER_DEG,
        }
    }
}

pub(crate) fn validate_orb(degrees: f64) -> Result<(), AspectError> {
    if degrees.is_finite() && (0.0..=180.0).contains(&degrees) {
        Ok(())
    } else {
        Err(AspectError::InvalidOrb { degrees })
    }
}
