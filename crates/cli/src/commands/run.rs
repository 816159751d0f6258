//! Run an audit over four report table files.
//!
//! Each file holds one `ReportTable` as JSON, the shape an external GA4
//! fetcher produces after decoding a `runReport` response:
//!
//! ```json
//! {
//!   "kind": "sessions_users",
//!   "dimension_headers": ["date"],
//!   "metric_headers": ["sessions", "totalUsers"],
//!   "rows": [{ "dimension_values": ["20240101"], "metric_values": [100, 80] }]
//! }
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::ValueEnum;
use ga4_audit_core::{AuditEngine, AuditInput, AuditResult, ReportTable};
use tracing::{debug, info, warn};

use crate::config::load_thresholds;
use crate::error::CliError;
use crate::render::write_text_report;

/// How the result is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Sectioned plain-text report.
    #[default]
    Text,
    /// The full result as JSON.
    Json,
    /// Flat export rows as JSON.
    Rows,
}

/// Arguments of the `run` command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub sessions: PathBuf,
    pub channels: PathBuf,
    pub transactions: PathBuf,
    pub funnel: PathBuf,
    pub thresholds: Option<PathBuf>,
    pub format: OutputFormat,
}

/// Load the tables, run the engine once and write the result.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, the thresholds are
/// invalid, the engine rejects the tables, or writing the output fails.
pub fn execute(args: &RunArgs) -> Result<(), CliError> {
    let input = AuditInput {
        sessions_users: load_table(&args.sessions)?,
        channel_medium: load_table(&args.channels)?,
        transactions: load_table(&args.transactions)?,
        funnel_events: load_table(&args.funnel)?,
    };

    let (thresholds, source) = load_thresholds(args.thresholds.as_deref())?;
    let engine = AuditEngine::new(thresholds);
    info!(
        %source,
        low_engagement = engine.thresholds().low_engagement_sessions_per_user,
        high_unassigned = engine.thresholds().high_unassigned_percent,
        "Loaded thresholds"
    );

    let result = engine.run(&input)?;
    for kind in input.empty_tables() {
        warn!(table = %kind, "Report table has no rows");
    }
    info!(
        flags = result.flags.len(),
        healthy = result.is_healthy(),
        "Audit complete"
    );

    let mut out = io::stdout().lock();
    write_result(&mut out, &result, args.format)?;
    out.flush()?;
    Ok(())
}

fn load_table(path: &Path) -> Result<ReportTable, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadTable {
        path: path.to_path_buf(),
        source,
    })?;
    let table: ReportTable =
        serde_json::from_str(&content).map_err(|source| CliError::ParseTable {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), table = %table.kind, rows = table.len(), "Loaded table");
    debug!(
        dimensions = ?table.dimension_headers,
        metrics = ?table.metric_headers,
        "Table headers"
    );
    Ok(table)
}

fn write_result<W: Write>(
    out: &mut W,
    result: &AuditResult,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => write_text_report(out, result, Utc::now())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
        OutputFormat::Rows => {
            serde_json::to_writer_pretty(&mut *out, &result.export_rows())?;
            writeln!(out)?;
        }
    }
    Ok(())
}
