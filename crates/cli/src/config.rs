//! Threshold configuration.
//!
//! Thresholds come from a YAML file when `--thresholds` is given, otherwise
//! from the environment (a `.env` file is loaded first if present).
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GA4_AUDIT_LOW_ENGAGEMENT_THRESHOLD` - Sessions per user below which a
//!   low engagement flag is raised (default: 1.5)
//! - `GA4_AUDIT_HIGH_UNASSIGNED_PERCENT` - Unassigned share above which a high
//!   unassigned traffic flag is raised (default: 20.0)
//!
//! # File Format
//!
//! ```yaml
//! low_engagement_sessions_per_user: 1.2
//! high_unassigned_percent: 15
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use ga4_audit_core::{AuditThresholds, ThresholdError};
use serde::Deserialize;
use thiserror::Error;

pub const LOW_ENGAGEMENT_ENV: &str = "GA4_AUDIT_LOW_ENGAGEMENT_THRESHOLD";
pub const HIGH_UNASSIGNED_ENV: &str = "GA4_AUDIT_HIGH_UNASSIGNED_PERCENT";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
    #[error("Failed to read threshold file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid threshold file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(#[from] ThresholdError),
}

/// Where the thresholds of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSource {
    File(PathBuf),
    Environment,
    Defaults,
}

impl fmt::Display for ThresholdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Environment => f.write_str("environment"),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

/// Threshold file contents. Unknown keys are rejected to catch typos.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThresholdsFile {
    low_engagement_sessions_per_user: Option<f64>,
    high_unassigned_percent: Option<f64>,
}

impl ThresholdsFile {
    fn apply(self, mut thresholds: AuditThresholds) -> AuditThresholds {
        if let Some(value) = self.low_engagement_sessions_per_user {
            thresholds = thresholds.with_low_engagement(value);
        }
        if let Some(value) = self.high_unassigned_percent {
            thresholds = thresholds.with_high_unassigned(value);
        }
        thresholds
    }
}

/// Load and validate thresholds for a run.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an environment
/// variable is not a number, or a threshold is negative or not finite.
pub fn load_thresholds(
    path: Option<&Path>,
) -> Result<(AuditThresholds, ThresholdSource), ConfigError> {
    let loaded = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            let thresholds = parse_thresholds_file(&content).map_err(|source| {
                ConfigError::ParseFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            (thresholds, ThresholdSource::File(path.to_path_buf()))
        }
        None => {
            dotenvy::dotenv().ok();
            thresholds_from_lookup(|key| std::env::var(key).ok())?
        }
    };

    loaded.0.validate()?;
    Ok(loaded)
}

/// Parse a YAML threshold file over the defaults.
fn parse_thresholds_file(content: &str) -> Result<AuditThresholds, serde_yaml::Error> {
    // An empty document deserializes as null.
    if content.trim().is_empty() {
        return Ok(AuditThresholds::default());
    }
    let file: ThresholdsFile = serde_yaml::from_str(content)?;
    Ok(file.apply(AuditThresholds::default()))
}

/// Read threshold overrides through `lookup`, falling back to defaults.
fn thresholds_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(AuditThresholds, ThresholdSource), ConfigError> {
    let low = lookup(LOW_ENGAGEMENT_ENV)
        .map(|v| parse_threshold(LOW_ENGAGEMENT_ENV, &v))
        .transpose()?;
    let high = lookup(HIGH_UNASSIGNED_ENV)
        .map(|v| parse_threshold(HIGH_UNASSIGNED_ENV, &v))
        .transpose()?;

    let source = if low.is_some() || high.is_some() {
        ThresholdSource::Environment
    } else {
        ThresholdSource::Defaults
    };

    let file = ThresholdsFile {
        low_engagement_sessions_per_user: low,
        high_unassigned_percent: high,
    };
    Ok((file.apply(AuditThresholds::default()), source))
}

fn parse_threshold(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidEnvVar(key, format!("{e}")))
}
