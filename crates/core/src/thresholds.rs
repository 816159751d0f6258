//! Thresholds that decide when an insight flag is raised.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from [`AuditThresholds::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    /// The threshold is NaN or infinite.
    #[error("threshold `{name}` must be a finite number")]
    NotFinite {
        /// Field name of the threshold.
        name: &'static str,
    },
    /// The threshold is below zero.
    #[error("threshold `{name}` must not be negative, got {value}")]
    Negative {
        /// Field name of the threshold.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Insight thresholds passed into the engine.
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file can override one threshold and keep the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditThresholds {
    /// Sessions per user strictly below this raises a low engagement flag.
    pub low_engagement_sessions_per_user: f64,
    /// Unassigned share (percent) strictly above this raises a high
    /// unassigned traffic flag.
    pub high_unassigned_percent: f64,
}

impl AuditThresholds {
    /// Default low engagement threshold (sessions per user).
    pub const DEFAULT_LOW_ENGAGEMENT_SESSIONS_PER_USER: f64 = 1.5;
    /// Default high unassigned traffic threshold (percent).
    pub const DEFAULT_HIGH_UNASSIGNED_PERCENT: f64 = 20.0;

    /// Create thresholds from explicit values.
    #[must_use]
    pub const fn new(low_engagement_sessions_per_user: f64, high_unassigned_percent: f64) -> Self {
        Self {
            low_engagement_sessions_per_user,
            high_unassigned_percent,
        }
    }

    /// Override the low engagement threshold.
    #[must_use]
    pub const fn with_low_engagement(mut self, sessions_per_user: f64) -> Self {
        self.low_engagement_sessions_per_user = sessions_per_user;
        self
    }

    /// Override the high unassigned traffic threshold.
    #[must_use]
    pub const fn with_high_unassigned(mut self, percent: f64) -> Self {
        self.high_unassigned_percent = percent;
        self
    }

    /// Check that every threshold is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the first threshold that fails the check.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        check(
            "low_engagement_sessions_per_user",
            self.low_engagement_sessions_per_user,
        )?;
        check("high_unassigned_percent", self.high_unassigned_percent)
    }
}

fn check(name: &'static str, value: f64) -> Result<(), ThresholdError> {
    if !value.is_finite() {
        return Err(ThresholdError::NotFinite { name });
    }
    if value < 0.0 {
        return Err(ThresholdError::Negative { name, value });
    }
    Ok(())
}

impl Default for AuditThresholds {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_LOW_ENGAGEMENT_SESSIONS_PER_USER,
            Self::DEFAULT_HIGH_UNASSIGNED_PERCENT,
        )
    }
}
