//! Flat (section, label, value) rows for spreadsheet and CSV exporters.
//!
//! Exporters iterate [`AuditResult::export_rows`] and never need to know how
//! the aggregates were computed. Row order is stable across runs.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{AuditResult, FunnelStage, Revenue};

/// Report section a row belongs to, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSection {
    SessionsAndUsers,
    UnassignedTraffic,
    TransactionsAndRevenue,
    ConversionFunnel,
    Insights,
}

impl ExportSection {
    /// Every section, in report order.
    pub const ALL: [Self; 5] = [
        Self::SessionsAndUsers,
        Self::UnassignedTraffic,
        Self::TransactionsAndRevenue,
        Self::ConversionFunnel,
        Self::Insights,
    ];

    /// Section heading used in rendered reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SessionsAndUsers => "1. SESSIONS AND USERS ANALYSIS (Last 90 Days)",
            Self::UnassignedTraffic => "2. UNASSIGNED TRAFFIC ANALYSIS",
            Self::TransactionsAndRevenue => "3. TRANSACTIONS AND REVENUE ANALYSIS",
            Self::ConversionFunnel => "4. CONVERSION FUNNEL ANALYSIS",
            Self::Insights => "5. KEY INSIGHTS",
        }
    }
}

/// A typed export value.
///
/// `Display` renders the value the way a spreadsheet cell shows it: ratios
/// and percents rounded to two decimals, `N/A` for unavailable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExportValue {
    Count(u64),
    Ratio(Option<f64>),
    Percent(Option<f64>),
    Currency(Revenue),
    Text(String),
}

impl ExportValue {
    /// Whether the value is an unavailable ratio or percent.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Ratio(None) | Self::Percent(None))
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(value) => write!(f, "{value}"),
            Self::Ratio(Some(value)) => write!(f, "{value:.2}"),
            Self::Percent(Some(value)) => write!(f, "{value:.2}%"),
            Self::Ratio(None) | Self::Percent(None) => f.write_str("N/A"),
            Self::Currency(revenue) => f.write_str(&revenue.display()),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One exported line of the audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub section: ExportSection,
    pub label: String,
    pub value: ExportValue,
}

impl ExportRow {
    fn new(section: ExportSection, label: impl Into<String>, value: ExportValue) -> Self {
        Self {
            section,
            label: label.into(),
            value,
        }
    }
}

impl AuditResult {
    /// Flatten the result into ordered export rows.
    #[must_use]
    pub fn export_rows(&self) -> Vec<ExportRow> {
        let mut rows = Vec::new();

        let section = ExportSection::SessionsAndUsers;
        rows.push(ExportRow::new(
            section,
            "Total Sessions (L90)",
            ExportValue::Count(self.sessions.total_sessions),
        ));
        rows.push(ExportRow::new(
            section,
            "Total Users (L90)",
            ExportValue::Count(self.sessions.total_users),
        ));
        rows.push(ExportRow::new(
            section,
            "Sessions per User",
            ExportValue::Ratio(self.sessions.sessions_per_user),
        ));

        let section = ExportSection::UnassignedTraffic;
        rows.push(ExportRow::new(
            section,
            "Unassigned Sessions (L90)",
            ExportValue::Count(self.unassigned.unassigned_sessions),
        ));
        rows.push(ExportRow::new(
            section,
            "Percent Unassigned Sessions",
            ExportValue::Percent(Some(self.unassigned.unassigned_percent)),
        ));
        rows.extend(self.unassigned.mediums.iter().map(|m| {
            ExportRow::new(
                section,
                format!("Unassigned - {}", m.medium),
                ExportValue::Count(m.sessions),
            )
        }));

        let section = ExportSection::TransactionsAndRevenue;
        rows.push(ExportRow::new(
            section,
            "Total Transactions (L90)",
            ExportValue::Count(self.transactions.total_transactions),
        ));
        rows.push(ExportRow::new(
            section,
            "Total Revenue (L90)",
            ExportValue::Currency(self.transactions.total_revenue),
        ));
        rows.extend(self.transactions.duplicates.iter().map(|d| {
            ExportRow::new(
                section,
                format!("Duplicate Transaction - {}", d.transaction_id),
                ExportValue::Count(d.count),
            )
        }));

        let section = ExportSection::ConversionFunnel;
        rows.extend(FunnelStage::ALL.into_iter().map(|stage| {
            ExportRow::new(
                section,
                format!("{} Events", stage.label()),
                ExportValue::Count(self.funnel.counts.get(stage)),
            )
        }));
        let rates = &self.funnel.rates;
        for (label, rate) in [
            ("View → Cart", rates.view_to_cart),
            ("Cart → Checkout", rates.cart_to_checkout),
            ("Checkout → Purchase", rates.checkout_to_purchase),
            ("View → Purchase", rates.view_to_purchase),
        ] {
            rows.push(ExportRow::new(section, label, ExportValue::Percent(rate)));
        }

        rows.extend(self.flags.iter().map(|flag| {
            ExportRow::new(
                ExportSection::Insights,
                flag.kind.label(),
                ExportValue::Text(flag.message.clone()),
            )
        }));

        rows
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{
        DuplicateTransaction, InsightFlag, InsightKind, MediumSessions, TransactionSummary,
        UnassignedTraffic,
    };

    #[test]
    fn test_value_display() {
        assert_eq!(ExportValue::Count(1200).to_string(), "1200");
        assert_eq!(ExportValue::Ratio(Some(1.254_9)).to_string(), "1.25");
        assert_eq!(ExportValue::Percent(Some(30.0)).to_string(), "30.00%");
        assert_eq!(ExportValue::Percent(None).to_string(), "N/A");
        assert_eq!(ExportValue::Ratio(None).to_string(), "N/A");
        assert_eq!(
            ExportValue::Currency(Revenue::new(Decimal::from(1_500))).to_string(),
            "$1,500.00"
        );
    }

    #[test]
    fn test_unavailable_is_distinct_from_zero() {
        assert!(ExportValue::Percent(None).is_unavailable());
        assert!(!ExportValue::Percent(Some(0.0)).is_unavailable());
        assert_ne!(
            ExportValue::Percent(None).to_string(),
            ExportValue::Percent(Some(0.0)).to_string()
        );
    }

    #[test]
    fn test_default_result_has_fixed_rows() {
        let rows = AuditResult::default().export_rows();
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Sessions (L90)",
                "Total Users (L90)",
                "Sessions per User",
                "Unassigned Sessions (L90)",
                "Percent Unassigned Sessions",
                "Total Transactions (L90)",
                "Total Revenue (L90)",
                "View Item Events",
                "Add to Cart Events",
                "Begin Checkout Events",
                "Purchase Events",
                "View → Cart",
                "Cart → Checkout",
                "Checkout → Purchase",
                "View → Purchase",
            ]
        );
    }

    #[test]
    fn test_breakdowns_follow_their_totals() {
        let result = AuditResult {
            unassigned: UnassignedTraffic {
                unassigned_sessions: 30,
                unassigned_percent: 30.0,
                mediums: vec![MediumSessions {
                    medium: "(not set)".to_string(),
                    sessions: 30,
                }],
            },
            transactions: TransactionSummary {
                total_transactions: 3,
                total_revenue: Revenue::new(Decimal::from(120)),
                duplicates: vec![DuplicateTransaction {
                    transaction_id: "T1".into(),
                    count: 2,
                }],
            },
            flags: vec![InsightFlag::new(InsightKind::DuplicateTransactions, "dupes")],
            ..AuditResult::default()
        };

        let rows = result.export_rows();
        let medium_pos = rows.iter().position(|r| r.label == "Unassigned - (not set)").unwrap();
        let dup_pos = rows
            .iter()
            .position(|r| r.label == "Duplicate Transaction - T1")
            .unwrap();

        assert_eq!(rows.get(medium_pos - 1).unwrap().label, "Percent Unassigned Sessions");
        assert_eq!(rows.get(dup_pos - 1).unwrap().label, "Total Revenue (L90)");
        assert_eq!(rows.get(dup_pos).unwrap().value, ExportValue::Count(2));

        let last = rows.last().unwrap();
        assert_eq!(last.section, ExportSection::Insights);
        assert_eq!(last.label, "Duplicate transactions detected");
        assert_eq!(last.value, ExportValue::Text("dupes".to_string()));
    }

    #[test]
    fn test_sections_are_in_report_order() {
        let rows = AuditResult::default().export_rows();
        let mut sections: Vec<ExportSection> = rows.iter().map(|r| r.section).collect();
        sections.dedup();
        assert_eq!(
            sections,
            vec![
                ExportSection::SessionsAndUsers,
                ExportSection::UnassignedTraffic,
                ExportSection::TransactionsAndRevenue,
                ExportSection::ConversionFunnel,
            ]
        );
    }
}
