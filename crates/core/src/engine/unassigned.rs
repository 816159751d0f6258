//! Unassigned traffic analysis.

use std::collections::BTreeMap;

use crate::error::AuditError;
use crate::types::{MediumSessions, ReportKind, ReportTable, UnassignedTraffic, fields};

use super::percent;

/// The channel group GA4 assigns to sessions it cannot attribute.
pub const UNASSIGNED_CHANNEL_GROUP: &str = "Unassigned";

/// Sum "Unassigned" sessions and break them down by medium.
///
/// Only rows whose channel group is exactly [`UNASSIGNED_CHANNEL_GROUP`]
/// count. Mediums are ordered by descending sessions, ties by medium name.
/// `total_sessions` comes from the sessions/users table; when it is zero the
/// percentage is 0.
///
/// # Errors
///
/// Returns an [`AuditError`] if the table is not a well-formed
/// [`ReportKind::ChannelMedium`] table, a count cannot be read, or the
/// unassigned total overflows.
pub fn analyze(table: &ReportTable, total_sessions: u64) -> Result<UnassignedTraffic, AuditError> {
    table.validate_as(ReportKind::ChannelMedium)?;

    let channel = table.dimension(fields::CHANNEL_GROUP)?;
    let medium = table.dimension(fields::SESSION_MEDIUM)?;
    let sessions = table.metric(fields::SESSIONS)?;

    let mut unassigned_sessions = 0_u64;
    let mut by_medium: BTreeMap<&str, u64> = BTreeMap::new();

    for (index, row) in table.rows.iter().enumerate() {
        let count = sessions.count(index, row)?;
        if channel.text(index, row)? != UNASSIGNED_CHANNEL_GROUP {
            continue;
        }

        // The grand total bounds every per-medium total.
        unassigned_sessions = unassigned_sessions
            .checked_add(count)
            .ok_or_else(|| {
                sessions.invalid(index, "unassigned session total is out of range")
            })?;
        *by_medium.entry(medium.text(index, row)?).or_default() += count;
    }

    let mut mediums: Vec<MediumSessions> = by_medium
        .into_iter()
        .map(|(medium, sessions)| MediumSessions {
            medium: medium.to_string(),
            sessions,
        })
        .collect();
    mediums.sort_by(|a, b| {
        b.sessions
            .cmp(&a.sessions)
            .then_with(|| a.medium.cmp(&b.medium))
    });

    Ok(UnassignedTraffic {
        unassigned_sessions,
        unassigned_percent: percent(unassigned_sessions, total_sessions).unwrap_or(0.0),
        mediums,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{MetricValue, ReportRow};

    fn channel_table(rows: &[(&str, &str, i64)]) -> ReportTable {
        rows.iter().fold(
            ReportTable::with_standard_schema(ReportKind::ChannelMedium),
            |table, (channel, medium, sessions)| {
                table.with_row(ReportRow::new([*channel, *medium], [*sessions]))
            },
        )
    }

    fn breakdown(traffic: &UnassignedTraffic) -> Vec<(&str, u64)> {
        traffic
            .mediums
            .iter()
            .map(|m| (m.medium.as_str(), m.sessions))
            .collect()
    }

    #[test]
    fn test_filters_to_unassigned() {
        let traffic = analyze(
            &channel_table(&[
                ("Unassigned", "(not set)", 30),
                ("Organic Search", "google", 70),
            ]),
            100,
        )
        .unwrap();

        assert_eq!(traffic.unassigned_sessions, 30);
        assert!((traffic.unassigned_percent - 30.0).abs() < f64::EPSILON);
        assert_eq!(breakdown(&traffic), vec![("(not set)", 30)]);
    }

    #[test]
    fn test_groups_and_orders_mediums() {
        let traffic = analyze(
            &channel_table(&[
                ("Unassigned", "referral", 5),
                ("Unassigned", "(not set)", 10),
                ("Unassigned", "email", 10),
                ("Unassigned", "referral", 7),
                ("Direct", "(none)", 50),
            ]),
            82,
        )
        .unwrap();

        assert_eq!(traffic.unassigned_sessions, 32);
        assert_eq!(
            breakdown(&traffic),
            vec![("referral", 12), ("(not set)", 10), ("email", 10)]
        );
    }

    #[test]
    fn test_channel_match_is_case_sensitive() {
        let traffic = analyze(
            &channel_table(&[("unassigned", "(not set)", 9), ("UNASSIGNED", "cpc", 4)]),
            13,
        )
        .unwrap();
        assert_eq!(traffic.unassigned_sessions, 0);
        assert!(traffic.mediums.is_empty());
    }

    #[test]
    fn test_zero_total_sessions_reports_zero_percent() {
        let traffic = analyze(&channel_table(&[("Unassigned", "(not set)", 3)]), 0).unwrap();
        assert_eq!(traffic.unassigned_sessions, 3);
        assert!(traffic.unassigned_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_count_in_other_channel_is_rejected() {
        let table = channel_table(&[("Unassigned", "(not set)", 3), ("Direct", "(none)", -2)]);
        assert!(matches!(
            analyze(&table, 10),
            Err(AuditError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_overflowing_unassigned_total_is_rejected() {
        let table = ReportTable::with_standard_schema(ReportKind::ChannelMedium)
            .with_row(ReportRow::new(
                ["Unassigned", "(not set)"],
                [MetricValue::Float(1.0e19)],
            ))
            .with_row(ReportRow::new(
                ["Unassigned", "referral"],
                [MetricValue::Float(1.0e19)],
            ));
        assert_eq!(
            analyze(&table, 1).unwrap_err(),
            AuditError::InvalidValue {
                table: ReportKind::ChannelMedium,
                field: fields::SESSIONS,
                row: 1,
                reason: "unassigned session total is out of range",
            }
        );
    }
}
