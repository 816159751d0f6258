//! Sessions and users aggregation.

use crate::error::AuditError;
use crate::types::{ReportKind, ReportTable, SessionsSummary, fields};

use super::ratio;

/// Sum sessions and users across every row of a sessions/users table.
///
/// The table may hold one row per date or a single pre-aggregated row; an
/// empty table yields zero totals and an unavailable ratio.
///
/// # Errors
///
/// Returns an [`AuditError`] if the table is not a well-formed
/// [`ReportKind::SessionsUsers`] table, a count cannot be read, or a total
/// overflows.
pub fn aggregate(table: &ReportTable) -> Result<SessionsSummary, AuditError> {
    table.validate_as(ReportKind::SessionsUsers)?;

    let sessions = table.metric(fields::SESSIONS)?;
    let users = table.metric(fields::TOTAL_USERS)?;

    let mut total_sessions = 0_u64;
    let mut total_users = 0_u64;
    for (index, row) in table.rows.iter().enumerate() {
        total_sessions = total_sessions
            .checked_add(sessions.count(index, row)?)
            .ok_or_else(|| sessions.invalid(index, "session total is out of range"))?;
        total_users = total_users
            .checked_add(users.count(index, row)?)
            .ok_or_else(|| users.invalid(index, "user total is out of range"))?;
    }

    Ok(SessionsSummary {
        total_sessions,
        total_users,
        sessions_per_user: ratio(total_sessions, total_users),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{MetricValue, ReportRow};

    fn daily_table(rows: &[(&str, i64, i64)]) -> ReportTable {
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

    #[test]
    fn test_single_row() {
        let summary = aggregate(&daily_table(&[("20240101", 100, 80)])).unwrap();
        assert_eq!(summary.total_sessions, 100);
        assert_eq!(summary.total_users, 80);
        assert_eq!(summary.sessions_per_user, Some(1.25));
    }

    #[test]
    fn test_sums_across_dates() {
        let summary = aggregate(&daily_table(&[
            ("20240101", 40, 30),
            ("20240102", 60, 50),
            ("20240103", 50, 20),
        ]))
        .unwrap();
        assert_eq!(summary.total_sessions, 150);
        assert_eq!(summary.total_users, 100);
        assert_eq!(summary.sessions_per_user, Some(1.5));
    }

    #[test]
    fn test_pre_aggregated_without_date() {
        let table = ReportTable::with_standard_schema(ReportKind::SessionsUsers)
            .with_row(ReportRow::new(Vec::<String>::new(), [300_i64, 120]));
        let summary = aggregate(&table).unwrap();
        assert_eq!(summary.total_sessions, 300);
        assert_eq!(summary.sessions_per_user, Some(2.5));
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let summary = aggregate(&daily_table(&[])).unwrap();
        assert_eq!(summary, SessionsSummary::default());
        assert_eq!(summary.sessions_per_user, None);
    }

    #[test]
    fn test_zero_users_leaves_ratio_unavailable() {
        let summary = aggregate(&daily_table(&[("20240101", 12, 0)])).unwrap();
        assert_eq!(summary.total_sessions, 12);
        assert_eq!(summary.sessions_per_user, None);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let err = aggregate(&daily_table(&[("20240101", 10, 5), ("20240102", -1, 5)])).unwrap_err();
        assert_eq!(
            err,
            AuditError::InvalidValue {
                table: ReportKind::SessionsUsers,
                field: fields::SESSIONS,
                row: 1,
                reason: "count is negative",
            }
        );
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let row = ReportRow::new(
            Vec::<String>::new(),
            [MetricValue::Float(1.0e19), MetricValue::Integer(1)],
        );
        let table = ReportTable::with_standard_schema(ReportKind::SessionsUsers)
            .with_row(row.clone())
            .with_row(row);
        assert_eq!(
            aggregate(&table).unwrap_err(),
            AuditError::InvalidValue {
                table: ReportKind::SessionsUsers,
                field: fields::SESSIONS,
                row: 1,
                reason: "session total is out of range",
            }
        );
    }

    #[test]
    fn test_missing_users_metric_is_malformed() {
        let table = ReportTable::new(ReportKind::SessionsUsers, [fields::DATE], [fields::SESSIONS]);
        assert!(matches!(
            aggregate(&table),
            Err(AuditError::MalformedInput { field: "totalUsers", .. })
        ));
    }
}
