//! Print the report query catalog.

use std::io::{self, Write};

use ga4_audit_core::{ReportWindow, audit_queries};
use tracing::info;

use crate::error::CliError;

/// Write the four audit queries for the default window to stdout as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn execute() -> Result<(), CliError> {
    let window = ReportWindow::default();
    let queries = audit_queries(&window);
    info!(
        queries = queries.len(),
        start = %window.start_date,
        end = %window.end_date,
        "Writing query catalog"
    );

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &queries)?;
    writeln!(out)?;
    Ok(())
}
