//! Integration tests for the GA4 audit engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ga4-audit-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `audit_scenarios` - End-to-end runs over hand-built and JSON tables
//! - `export_rows` - Export row order, labels and values
//! - `audit_properties` - Property tests for aggregate invariants
//!
//! This crate holds the table builders the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use ga4_audit_core::{AuditInput, MetricValue, ReportKind, ReportRow, ReportTable, Revenue, fields};
use rust_decimal::Decimal;

/// Sessions/users table with one row per date.
#[must_use]
pub fn sessions_table(rows: &[(&str, i64, i64)]) -> ReportTable {
    rows.iter().fold(
        ReportTable::new(
            ReportKind::SessionsUsers,
            [fields::DATE],
            [fields::SESSIONS, fields::TOTAL_USERS],
        ),
        |table, (date, sessions, users)| {
            table.with_row(ReportRow::new([*date], [*sessions, *users]))
        },
    )
}

/// Channel group / medium table.
#[must_use]
pub fn channel_table(rows: &[(&str, &str, i64)]) -> ReportTable {
    rows.iter().fold(
        ReportTable::with_standard_schema(ReportKind::ChannelMedium),
        |table, (channel, medium, sessions)| {
            table.with_row(ReportRow::new([*channel, *medium], [*sessions]))
        },
    )
}

/// Transactions table with revenue decoded as floats, the way the API client
/// decodes currency metrics.
#[must_use]
pub fn transactions_table(rows: &[(&str, f64)]) -> ReportTable {
    rows.iter().fold(
        ReportTable::with_standard_schema(ReportKind::Transactions),
        |table, (id, revenue)| table.with_row(ReportRow::new([*id], [MetricValue::Float(*revenue)])),
    )
}

/// Transactions table keyed by ID with a transaction count per row, the
/// shape the API returns when `transactions` is requested alongside revenue.
#[must_use]
pub fn counted_transactions_table(rows: &[(&str, i64, f64)]) -> ReportTable {
    rows.iter().fold(
        ReportTable::new(
            ReportKind::Transactions,
            [fields::TRANSACTION_ID],
            [fields::TRANSACTIONS, fields::TOTAL_REVENUE],
        ),
        |table, (id, count, revenue)| {
            table.with_row(ReportRow::new(
                [*id],
                [MetricValue::Integer(*count), MetricValue::Float(*revenue)],
            ))
        },
    )
}

/// Funnel events table.
#[must_use]
pub fn funnel_table(rows: &[(&str, i64)]) -> ReportTable {
    rows.iter().fold(
        ReportTable::with_standard_schema(ReportKind::FunnelEvents),
        |table, (event, count)| table.with_row(ReportRow::new([*event], [*count])),
    )
}

/// Input where every table is empty but well formed.
#[must_use]
pub fn empty_input() -> AuditInput {
    AuditInput {
        sessions_users: sessions_table(&[]),
        channel_medium: channel_table(&[]),
        transactions: transactions_table(&[]),
        funnel_events: funnel_table(&[]),
    }
}

/// A small store over one week: healthy engagement, some unassigned
/// traffic, one duplicated order and a funnel with no purchases.
#[must_use]
pub fn store_input() -> AuditInput {
    AuditInput {
        sessions_users: sessions_table(&[
            ("20240101", 100, 80),
            ("20240102", 140, 90),
            ("20240103", 160, 80),
        ]),
        channel_medium: channel_table(&[
            ("Organic Search", "organic", 220),
            ("Direct", "(none)", 100),
            ("Unassigned", "(not set)", 50),
            ("Unassigned", "referral", 30),
        ]),
        transactions: transactions_table(&[
            ("ORD-1001", 49.99),
            ("ORD-1002", 120.0),
            ("ORD-1001", 49.99),
            ("ORD-1003", 15.5),
        ]),
        funnel_events: funnel_table(&[
            ("page_view", 4000),
            ("view_item", 1000),
            ("add_to_cart", 200),
            ("begin_checkout", 50),
            ("purchase", 0),
        ]),
    }
}

/// Revenue from a whole number of cents.
#[must_use]
pub fn dollars(cents: i64) -> Revenue {
    Revenue::new(Decimal::new(cents, 2))
}

/// Decode a table from a JSON fixture.
///
/// # Errors
///
/// Returns the decode error if `value` is not a valid table.
pub fn table_from_json(value: serde_json::Value) -> Result<ReportTable, serde_json::Error> {
    serde_json::from_value(value)
}
