//! Property tests for aggregate invariants.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use ga4_audit_core::{AuditEngine, AuditInput, AuditThresholds, InsightKind, run_audit};
use ga4_audit_integration_tests::{
    channel_table, counted_transactions_table, empty_input, funnel_table, sessions_table,
    transactions_table,
};
use proptest::prelude::*;
use proptest::sample::select;

const CHANNELS: &[&str] = &["Unassigned", "Direct", "Organic Search", "Paid Search"];
const MEDIUMS: &[&str] = &["(not set)", "(none)", "referral", "email", "cpc"];
const EVENTS: &[&str] = &[
    "view_item",
    "add_to_cart",
    "begin_checkout",
    "purchase",
    "page_view",
];
const TRANSACTION_IDS: &[&str] = &["T1", "T2", "T3", "T4", "T5", "T6"];

fn daily_counts() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0_i64..50_000, 0_i64..50_000), 0..30)
}

fn channel_rows() -> impl Strategy<Value = Vec<(&'static str, &'static str, i64)>> {
    prop::collection::vec((select(CHANNELS), select(MEDIUMS), 0_i64..10_000), 0..40)
}

fn transaction_rows() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((select(TRANSACTION_IDS), 0_i64..100_000), 0..40)
}

fn counted_transaction_rows() -> impl Strategy<Value = Vec<(&'static str, i64, f64)>> {
    prop::collection::vec((select(TRANSACTION_IDS), 0_i64..5, 0.0_f64..1_000.0), 0..20)
}

fn funnel_rows() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((select(EVENTS), 0_i64..10_000), 0..12)
}

fn dated(counts: &[(i64, i64)]) -> Vec<(String, i64, i64)> {
    counts
        .iter()
        .enumerate()
        .map(|(day, (sessions, users))| (format!("2024{:04}", day + 101), *sessions, *users))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn cents_to_float<'a>(rows: &[(&'a str, i64)]) -> Vec<(&'a str, f64)> {
    rows.iter()
        .map(|(id, cents)| (*id, *cents as f64 / 100.0))
        .collect()
}

fn input_from(
    counts: &[(i64, i64)],
    channels: &[(&str, &str, i64)],
    transactions: &[(&str, i64)],
    funnel: &[(&str, i64)],
) -> AuditInput {
    let dated = dated(counts);
    let sessions: Vec<(&str, i64, i64)> = dated
        .iter()
        .map(|(date, s, u)| (date.as_str(), *s, *u))
        .collect();

    AuditInput {
        sessions_users: sessions_table(&sessions),
        channel_medium: channel_table(channels),
        transactions: transactions_table(&cents_to_float(transactions)),
        funnel_events: funnel_table(funnel),
    }
}

proptest! {
    #[test]
    fn sessions_per_user_times_users_is_sessions(counts in daily_counts()) {
        let input = input_from(&counts, &[], &[], &[]);
        let summary = run_audit(&input, &AuditThresholds::default()).unwrap().sessions;

        let sessions: i64 = counts.iter().map(|(s, _)| s).sum();
        let users: i64 = counts.iter().map(|(_, u)| u).sum();
        prop_assert_eq!(summary.total_sessions, u64::try_from(sessions).unwrap());
        prop_assert_eq!(summary.total_users, u64::try_from(users).unwrap());

        match summary.sessions_per_user {
            Some(ratio) => {
                prop_assert!(users > 0);
                #[allow(clippy::cast_precision_loss)]
                let (sessions, users) = (sessions as f64, users as f64);
                prop_assert!((ratio * users - sessions).abs() <= 1e-6 * sessions.max(1.0));
            }
            None => prop_assert_eq!(users, 0),
        }
    }

    #[test]
    fn medium_breakdown_sums_to_unassigned(channels in channel_rows()) {
        let input = AuditInput {
            channel_medium: channel_table(&channels),
            ..empty_input()
        };
        let traffic = run_audit(&input, &AuditThresholds::default()).unwrap().unassigned;

        let by_medium: u64 = traffic.mediums.iter().map(|m| m.sessions).sum();
        prop_assert_eq!(by_medium, traffic.unassigned_sessions);

        let expected: i64 = channels
            .iter()
            .filter(|(channel, _, _)| *channel == "Unassigned")
            .map(|(_, _, sessions)| sessions)
            .sum();
        prop_assert_eq!(traffic.unassigned_sessions, u64::try_from(expected).unwrap());

        // Descending by sessions, ties by medium name.
        let sorted = traffic.mediums.windows(2).all(|w| {
            w[0].sessions > w[1].sessions
                || (w[0].sessions == w[1].sessions && w[0].medium < w[1].medium)
        });
        prop_assert!(sorted);
    }

    #[test]
    fn duplicates_are_exactly_the_repeated_ids(rows in transaction_rows()) {
        let input = AuditInput {
            transactions: transactions_table(&cents_to_float(&rows)),
            ..empty_input()
        };
        let summary = run_audit(&input, &AuditThresholds::default()).unwrap().transactions;

        let mut occurrences: HashMap<&str, u64> = HashMap::new();
        for (id, _) in &rows {
            *occurrences.entry(*id).or_default() += 1;
        }

        prop_assert_eq!(summary.total_transactions, rows.len() as u64);
        let listed: u64 = summary.duplicates.iter().map(|d| d.count).sum();
        prop_assert!(listed <= summary.total_transactions);

        for duplicate in &summary.duplicates {
            prop_assert!(duplicate.count > 1);
            prop_assert_eq!(occurrences[duplicate.transaction_id.as_str()], duplicate.count);
        }
        let repeated = occurrences.values().filter(|count| **count > 1).count();
        prop_assert_eq!(summary.duplicates.len(), repeated);
        prop_assert_eq!(summary.has_duplicates(), repeated > 0);
    }

    #[test]
    fn transaction_counts_weight_totals_and_duplicates(rows in counted_transaction_rows()) {
        let input = AuditInput {
            transactions: counted_transactions_table(&rows),
            ..empty_input()
        };
        let summary = run_audit(&input, &AuditThresholds::default()).unwrap().transactions;

        let mut occurrences: HashMap<&str, u64> = HashMap::new();
        for (id, count, _) in &rows {
            *occurrences.entry(*id).or_default() += u64::try_from(*count).unwrap();
        }

        prop_assert_eq!(summary.total_transactions, occurrences.values().sum::<u64>());
        for duplicate in &summary.duplicates {
            prop_assert_eq!(occurrences[duplicate.transaction_id.as_str()], duplicate.count);
        }
        let repeated = occurrences.values().filter(|count| **count > 1).count();
        prop_assert_eq!(summary.duplicates.len(), repeated);
    }

    #[test]
    fn funnel_rates_unavailable_only_for_zero_denominators(rows in funnel_rows()) {
        let input = AuditInput {
            funnel_events: funnel_table(&rows),
            ..empty_input()
        };
        let funnel = run_audit(&input, &AuditThresholds::default()).unwrap().funnel;
        let counts = funnel.counts;

        prop_assert_eq!(funnel.rates.view_to_cart.is_none(), counts.view_item == 0);
        prop_assert_eq!(funnel.rates.cart_to_checkout.is_none(), counts.add_to_cart == 0);
        prop_assert_eq!(
            funnel.rates.checkout_to_purchase.is_none(),
            counts.begin_checkout == 0
        );
        prop_assert_eq!(funnel.rates.view_to_purchase.is_none(), counts.view_item == 0);

        let missing = run_audit(&input, &AuditThresholds::default())
            .unwrap()
            .has_flag(InsightKind::MissingPurchaseEvents);
        prop_assert_eq!(missing, counts.purchase == 0 && counts.begin_checkout > 0);
    }

    #[test]
    fn runs_are_deterministic(
        counts in daily_counts(),
        channels in channel_rows(),
        transactions in transaction_rows(),
        funnel in funnel_rows(),
    ) {
        let input = input_from(&counts, &channels, &transactions, &funnel);
        let engine = AuditEngine::default();

        let first = engine.run(&input).unwrap();
        let second = engine.run(&input.clone()).unwrap();
        prop_assert_eq!(first.export_rows(), second.export_rows());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn low_engagement_flag_follows_threshold(
        counts in daily_counts(),
        threshold in 0.0_f64..5.0,
    ) {
        let input = input_from(&counts, &[], &[], &[]);
        let thresholds = AuditThresholds::default().with_low_engagement(threshold);
        let result = AuditEngine::new(thresholds).run(&input).unwrap();

        let expected = result
            .sessions
            .sessions_per_user
            .is_some_and(|ratio| ratio < threshold);
        prop_assert_eq!(result.has_flag(InsightKind::LowEngagement), expected);
    }
}
