//! CLI error type.

use std::path::PathBuf;

use ga4_audit_core::AuditError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A report table file could not be read.
    #[error("Failed to read table {}: {source}", path.display())]
    ReadTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report table file is not a valid table.
    #[error("Failed to parse table {}: {source}", path.display())]
    ParseTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Threshold configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine rejected the input tables.
    #[error("Audit failed: {0}")]
    Audit(#[from] AuditError),

    /// Output could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
