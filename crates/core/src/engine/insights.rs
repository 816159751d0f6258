//! Insight flag rules.
//!
//! Rules run in a fixed order and each raises at most one flag:
//!
//! 1. low engagement (sessions per user below threshold)
//! 2. high unassigned traffic (unassigned share above threshold)
//! 3. duplicate transactions
//! 4. missing purchase events (checkouts without purchases)
//!
//! followed by one empty table flag per input table with no rows.

use crate::thresholds::AuditThresholds;
use crate::types::{AuditResult, InsightFlag, InsightKind, ReportKind};

/// Evaluate every rule against a computed result.
#[must_use]
pub fn evaluate(
    result: &AuditResult,
    empty_tables: &[ReportKind],
    thresholds: &AuditThresholds,
) -> Vec<InsightFlag> {
    let mut flags: Vec<InsightFlag> = [
        low_engagement(result, thresholds),
        high_unassigned_traffic(result, thresholds),
        duplicate_transactions(result),
        missing_purchase_events(result),
    ]
    .into_iter()
    .flatten()
    .collect();

    flags.extend(empty_tables.iter().map(|&table| {
        InsightFlag::for_table(
            InsightKind::EmptyTable,
            table,
            format!("The {table} report returned no rows; its metrics default to zero"),
        )
    }));

    flags
}

fn low_engagement(result: &AuditResult, thresholds: &AuditThresholds) -> Option<InsightFlag> {
    let ratio = result.sessions.sessions_per_user?;
    let threshold = thresholds.low_engagement_sessions_per_user;
    (ratio < threshold).then(|| {
        InsightFlag::new(
            InsightKind::LowEngagement,
            format!(
                "Sessions per user is {ratio:.2}, below {threshold}; consider improving user engagement"
            ),
        )
    })
}

fn high_unassigned_traffic(
    result: &AuditResult,
    thresholds: &AuditThresholds,
) -> Option<InsightFlag> {
    let share = result.unassigned.unassigned_percent;
    let threshold = thresholds.high_unassigned_percent;
    (share > threshold).then(|| {
        InsightFlag::new(
            InsightKind::HighUnassignedTraffic,
            format!(
                "{share:.2}% of sessions are unassigned, above {threshold}%; review UTM parameters and attribution"
            ),
        )
    })
}

fn duplicate_transactions(result: &AuditResult) -> Option<InsightFlag> {
    let affected = result.transactions.duplicates.len();
    (affected > 0).then(|| {
        let noun = if affected == 1 {
            "transaction ID was"
        } else {
            "transaction IDs were"
        };
        InsightFlag::new(
            InsightKind::DuplicateTransactions,
            format!("{affected} {noun} recorded more than once; review the e-commerce implementation"),
        )
    })
}

fn missing_purchase_events(result: &AuditResult) -> Option<InsightFlag> {
    let counts = &result.funnel.counts;
    (counts.purchase == 0 && counts.begin_checkout > 0).then(|| {
        InsightFlag::new(
            InsightKind::MissingPurchaseEvents,
            format!(
                "No purchase events despite {} begin_checkout events; check e-commerce tracking setup",
                counts.begin_checkout
            ),
        )
    })
}
