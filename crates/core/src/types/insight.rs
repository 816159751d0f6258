//! Insight flags raised by an audit.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ReportKind;

/// The kind of condition an insight flag reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Sessions per user is below the engagement threshold.
    LowEngagement,
    /// Unassigned traffic share is above the threshold.
    HighUnassignedTraffic,
    /// At least one transaction ID was recorded more than once.
    DuplicateTransactions,
    /// Checkouts were started but no purchase events were recorded.
    MissingPurchaseEvents,
    /// An input table had no rows.
    EmptyTable,
}

impl InsightKind {
    /// Get a display-friendly label for the flag.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowEngagement => "Low sessions per user",
            Self::HighUnassignedTraffic => "High unassigned traffic",
            Self::DuplicateTransactions => "Duplicate transactions detected",
            Self::MissingPurchaseEvents => "No purchase events",
            Self::EmptyTable => "Empty report table",
        }
    }

    /// Machine-readable name of the flag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowEngagement => "low_engagement",
            Self::HighUnassignedTraffic => "high_unassigned_traffic",
            Self::DuplicateTransactions => "duplicate_transactions",
            Self::MissingPurchaseEvents => "missing_purchase_events",
            Self::EmptyTable => "empty_table",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low_engagement" => Ok(Self::LowEngagement),
            "high_unassigned_traffic" => Ok(Self::HighUnassignedTraffic),
            "duplicate_transactions" => Ok(Self::DuplicateTransactions),
            "missing_purchase_events" => Ok(Self::MissingPurchaseEvents),
            "empty_table" => Ok(Self::EmptyTable),
            _ => Err(format!("invalid insight kind: {s}")),
        }
    }
}

/// One qualitative finding about the audited property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightFlag {
    /// What kind of condition was detected.
    pub kind: InsightKind,
    /// The table the flag refers to, for table-level conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<ReportKind>,
    /// Human-readable explanation.
    pub message: String,
}

impl InsightFlag {
    /// Create a property-level flag.
    #[must_use]
    pub fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            table: None,
            message: message.into(),
        }
    }

    /// Create a flag about one input table.
    #[must_use]
    pub fn for_table(kind: InsightKind, table: ReportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            table: Some(table),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            InsightKind::LowEngagement,
            InsightKind::HighUnassignedTraffic,
            InsightKind::DuplicateTransactions,
            InsightKind::MissingPurchaseEvents,
            InsightKind::EmptyTable,
        ] {
            assert_eq!(kind.to_string().parse::<InsightKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_table_is_omitted_for_property_flags() {
        let flag = InsightFlag::new(InsightKind::LowEngagement, "low");
        let json = serde_json::to_value(&flag).unwrap();
        assert!(json.get("table").is_none());
        assert_eq!(json["kind"], "low_engagement");
    }
}
