//! The audit engine.
//!
//! Each operation lives in its own module and is a pure function of one
//! table. [`AuditEngine::run`] validates all four tables first, so a
//! malformed table aborts the run before anything is aggregated.

pub mod funnel;
pub mod insights;
pub mod sessions;
pub mod transactions;
pub mod unassigned;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::thresholds::AuditThresholds;
use crate::types::{AuditResult, ReportKind, ReportTable, ReportWindow};

/// The four tables one audit consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInput {
    /// Sessions and total users.
    pub sessions_users: ReportTable,
    /// Sessions by channel group and medium.
    pub channel_medium: ReportTable,
    /// Revenue by transaction ID.
    pub transactions: ReportTable,
    /// Funnel event counts by event name.
    pub funnel_events: ReportTable,
}

impl AuditInput {
    /// Tables paired with the kind their slot requires, in audit order.
    #[must_use]
    pub const fn slots(&self) -> [(ReportKind, &ReportTable); 4] {
        [
            (ReportKind::SessionsUsers, &self.sessions_users),
            (ReportKind::ChannelMedium, &self.channel_medium),
            (ReportKind::Transactions, &self.transactions),
            (ReportKind::FunnelEvents, &self.funnel_events),
        ]
    }

    /// Validate every table against its slot.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, in slot order.
    pub fn validate(&self) -> Result<(), AuditError> {
        self.slots()
            .into_iter()
            .try_for_each(|(kind, table)| table.validate_as(kind))
    }

    /// Kinds of the tables that have no rows, in slot order.
    #[must_use]
    pub fn empty_tables(&self) -> Vec<ReportKind> {
        self.slots()
            .into_iter()
            .filter(|(_, table)| table.is_empty())
            .map(|(kind, _)| kind)
            .collect()
    }
}

/// Runs audits with a fixed set of thresholds.
///
/// The engine holds no state besides its thresholds; every call to
/// [`AuditEngine::run`] is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AuditEngine {
    thresholds: AuditThresholds,
}

impl AuditEngine {
    /// Create an engine with the given thresholds.
    #[must_use]
    pub const fn new(thresholds: AuditThresholds) -> Self {
        Self { thresholds }
    }

    /// The thresholds this engine applies.
    #[must_use]
    pub const fn thresholds(&self) -> &AuditThresholds {
        &self.thresholds
    }

    /// Run one audit.
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] if any table is in the wrong slot, misses a
    /// required column, has a row that does not match its schema, or holds a
    /// value that cannot be read. No partial result is produced.
    pub fn run(&self, input: &AuditInput) -> Result<AuditResult, AuditError> {
        input.validate()?;

        let sessions = sessions::aggregate(&input.sessions_users)?;
        let unassigned = unassigned::analyze(&input.channel_medium, sessions.total_sessions)?;
        let transactions = transactions::analyze(&input.transactions)?;
        let funnel = funnel::analyze(&input.funnel_events)?;

        let mut result = AuditResult {
            window: ReportWindow::default(),
            sessions,
            unassigned,
            transactions,
            funnel,
            flags: Vec::new(),
        };
        result.flags = insights::evaluate(&result, &input.empty_tables(), &self.thresholds);

        Ok(result)
    }
}

/// Run one audit with `thresholds`.
///
/// # Errors
///
/// See [`AuditEngine::run`].
pub fn run_audit(
    input: &AuditInput,
    thresholds: &AuditThresholds,
) -> Result<AuditResult, AuditError> {
    AuditEngine::new(*thresholds).run(input)
}

/// `part / whole`, or `None` when `whole` is zero.
// Counts from a 90-day GA4 window never approach f64's exact integer range (2^53)
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}

/// `part / whole * 100`, or `None` when `whole` is zero.
// Counts from a 90-day GA4 window never approach f64's exact integer range (2^53)
#[allow(clippy::cast_precision_loss)]
pub(crate) fn percent(part: u64, whole: u64) -> Option<f64> {
    (whole > 0).then(|| part as f64 * 100.0 / whole as f64)
}
