//! GA4 Audit Core - Pure audit engine for Google Analytics 4 report tables.
//!
//! This crate turns decoded GA4 report rows into an [`AuditResult`]: session and
//! user totals, unassigned traffic breakdown, transaction and duplicate
//! detection, funnel conversion rates, and insight flags.
//!
//! # Architecture
//!
//! The core crate contains only types and pure computation - no I/O, no
//! logging, no HTTP clients. Fetching the four report tables, rendering and
//! exporting the result are left to the caller (see the `ga4-audit` CLI).
//!
//! # Modules
//!
//! - [`types`] - Report tables, schema constants, the result aggregate and its export rows
//! - [`engine`] - The audit operations and the [`AuditEngine`] that runs them
//! - [`thresholds`] - Configurable insight thresholds
//! - [`error`] - Boundary validation errors
//!
//! # Example
//!
//! ```
//! use ga4_audit_core::{AuditEngine, AuditInput, ReportKind, ReportRow, ReportTable};
//!
//! let sessions = ReportTable::with_standard_schema(ReportKind::SessionsUsers)
//!     .with_row(ReportRow::new(Vec::<String>::new(), [100_i64, 80]));
//! let input = AuditInput {
//!     sessions_users: sessions,
//!     channel_medium: ReportTable::with_standard_schema(ReportKind::ChannelMedium),
//!     transactions: ReportTable::with_standard_schema(ReportKind::Transactions),
//!     funnel_events: ReportTable::with_standard_schema(ReportKind::FunnelEvents),
//! };
//!
//! let result = AuditEngine::default().run(&input).unwrap();
//! assert_eq!(result.sessions.total_sessions, 100);
//! assert_eq!(result.sessions.sessions_per_user, Some(1.25));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod engine;
pub mod error;
pub mod thresholds;
pub mod types;

pub use engine::{AuditEngine, AuditInput, run_audit};
pub use error::{AuditError, ColumnRole};
pub use thresholds::{AuditThresholds, ThresholdError};
pub use types::*;
