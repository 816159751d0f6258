//! Errors raised while validating audit input tables.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ReportKind;

/// Whether a column is a dimension or a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Dimension,
    Metric,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension => write!(f, "dimension"),
            Self::Metric => write!(f, "metric"),
        }
    }
}

/// Errors that abort an audit run.
///
/// Every variant names the offending table. Empty tables and zero
/// denominators are not errors; they surface as insight flags and
/// unavailable values on the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A required column is not declared by the table.
    #[error("{table} table is missing expected {role} `{field}`")]
    MalformedInput {
        /// The table missing the column.
        table: ReportKind,
        /// Whether the missing column is a dimension or a metric.
        role: ColumnRole,
        /// The missing field name.
        field: &'static str,
    },

    /// A row does not carry the number of values its schema declares.
    #[error(
        "{table} table row {row} has {found_dimensions} dimension and {found_metrics} metric \
         values, expected {expected_dimensions} and {expected_metrics}"
    )]
    RowShape {
        /// The table containing the row.
        table: ReportKind,
        /// Zero-based row index.
        row: usize,
        /// Declared dimension count.
        expected_dimensions: usize,
        /// Declared metric count.
        expected_metrics: usize,
        /// Dimension values present in the row.
        found_dimensions: usize,
        /// Metric values present in the row.
        found_metrics: usize,
    },

    /// A value cannot be interpreted for its field.
    #[error("{table} table row {row} has an invalid `{field}` value: {reason}")]
    InvalidValue {
        /// The table containing the value.
        table: ReportKind,
        /// The field being read.
        field: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A table was supplied in the slot of a different report kind.
    #[error("expected a {expected} table, got {found}")]
    WrongTable {
        /// The kind the slot requires.
        expected: ReportKind,
        /// The kind tag the table carries.
        found: ReportKind,
    },
}

impl AuditError {
    /// The table the error refers to.
    #[must_use]
    pub const fn table(&self) -> ReportKind {
        match self {
            Self::MalformedInput { table, .. }
            | Self::RowShape { table, .. }
            | Self::InvalidValue { table, .. } => *table,
            Self::WrongTable { expected, .. } => *expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message() {
        let err = AuditError::MalformedInput {
            table: ReportKind::Transactions,
            role: ColumnRole::Dimension,
            field: "transactionId",
        };
        assert_eq!(
            err.to_string(),
            "transactions table is missing expected dimension `transactionId`"
        );
        assert_eq!(err.table(), ReportKind::Transactions);
    }

    #[test]
    fn test_wrong_table_reports_expected_slot() {
        let err = AuditError::WrongTable {
            expected: ReportKind::FunnelEvents,
            found: ReportKind::SessionsUsers,
        };
        assert_eq!(err.to_string(), "expected a funnel_events table, got sessions_users");
        assert_eq!(err.table(), ReportKind::FunnelEvents);
    }
}
