//! Decoded GA4 report tables and their declared schemas.
//!
//! A [`ReportTable`] is the boundary between the reporting API client and the
//! engine. Columns are located by name, so the order in which the API returns
//! dimensions and metrics does not matter; what matters is that every column a
//! [`ReportKind`] requires is declared and that every row matches the
//! declared schema.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, ColumnRole};

/// Number of trailing days every audit table covers.
pub const TRAILING_WINDOW_DAYS: u32 = 90;

/// GA4 API field names used by the audit queries.
pub mod fields {
    /// Date dimension (`YYYYMMDD`).
    pub const DATE: &str = "date";
    /// Session count metric.
    pub const SESSIONS: &str = "sessions";
    /// Total users metric.
    pub const TOTAL_USERS: &str = "totalUsers";
    /// Default channel group dimension.
    pub const CHANNEL_GROUP: &str = "defaultChannelGrouping";
    /// Session medium dimension.
    pub const SESSION_MEDIUM: &str = "sessionMedium";
    /// Transaction ID dimension.
    pub const TRANSACTION_ID: &str = "transactionId";
    /// Total revenue metric.
    pub const TOTAL_REVENUE: &str = "totalRevenue";
    /// Transaction count metric.
    pub const TRANSACTIONS: &str = "transactions";
    /// Event name dimension.
    pub const EVENT_NAME: &str = "eventName";
    /// Event count metric.
    pub const EVENT_COUNT: &str = "eventCount";
}

// =============================================================================
// Report Kinds
// =============================================================================

/// The four logical queries an audit consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Sessions and total users, per date or pre-aggregated.
    SessionsUsers,
    /// Sessions keyed by channel group and medium.
    ChannelMedium,
    /// Revenue keyed by transaction ID.
    Transactions,
    /// Event counts keyed by event name.
    FunnelEvents,
}

impl ReportKind {
    /// Every report kind, in audit order.
    pub const ALL: [Self; 4] = [
        Self::SessionsUsers,
        Self::ChannelMedium,
        Self::Transactions,
        Self::FunnelEvents,
    ];

    /// Machine-readable name of the table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionsUsers => "sessions_users",
            Self::ChannelMedium => "channel_medium",
            Self::Transactions => "transactions",
            Self::FunnelEvents => "funnel_events",
        }
    }

    /// Dimensions that must be declared by a table of this kind.
    #[must_use]
    pub const fn required_dimensions(self) -> &'static [&'static str] {
        match self {
            Self::SessionsUsers => &[],
            Self::ChannelMedium => &[fields::CHANNEL_GROUP, fields::SESSION_MEDIUM],
            Self::Transactions => &[fields::TRANSACTION_ID],
            Self::FunnelEvents => &[fields::EVENT_NAME],
        }
    }

    /// Metrics that must be declared by a table of this kind.
    #[must_use]
    pub const fn required_metrics(self) -> &'static [&'static str] {
        match self {
            Self::SessionsUsers => &[fields::SESSIONS, fields::TOTAL_USERS],
            Self::ChannelMedium => &[fields::SESSIONS],
            Self::Transactions => &[fields::TOTAL_REVENUE],
            Self::FunnelEvents => &[fields::EVENT_COUNT],
        }
    }

    /// Metrics a table of this kind may declare to refine its rows.
    ///
    /// A transactions table keyed only by `transactionId` gets one row per
    /// ID from the API; the `transactions` metric carries how many
    /// transactions each row stands for.
    #[must_use]
    pub const fn optional_metrics(self) -> &'static [&'static str] {
        match self {
            Self::Transactions => &[fields::TRANSACTIONS],
            Self::SessionsUsers | Self::ChannelMedium | Self::FunnelEvents => &[],
        }
    }

    /// The query an API client should run to produce a table of this kind.
    #[must_use]
    pub fn query(self, window: &ReportWindow) -> ReportQuery {
        let dimension_filter = match self {
            Self::FunnelEvents => Some(DimensionFilter {
                field_name: fields::EVENT_NAME.to_string(),
                in_list: FunnelStage::ALL
                    .iter()
                    .map(|stage| stage.event_name().to_string())
                    .collect(),
            }),
            Self::SessionsUsers | Self::ChannelMedium | Self::Transactions => None,
        };

        ReportQuery {
            kind: self,
            date_range: window.clone(),
            dimensions: to_owned_names(self.required_dimensions()),
            metrics: to_owned_names(self.required_metrics())
                .into_iter()
                .chain(to_owned_names(self.optional_metrics()))
                .collect(),
            dimension_filter,
        }
    }
}

fn to_owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid report kind: {s}"))
    }
}

// =============================================================================
// Funnel Stages
// =============================================================================

/// One of the four tracked e-commerce events, in conversion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    ViewItem,
    AddToCart,
    BeginCheckout,
    Purchase,
}

impl FunnelStage {
    /// Every stage, earliest first.
    pub const ALL: [Self; 4] = [
        Self::ViewItem,
        Self::AddToCart,
        Self::BeginCheckout,
        Self::Purchase,
    ];

    /// The GA4 event name for this stage.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::ViewItem => "view_item",
            Self::AddToCart => "add_to_cart",
            Self::BeginCheckout => "begin_checkout",
            Self::Purchase => "purchase",
        }
    }

    /// Display label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewItem => "View Item",
            Self::AddToCart => "Add to Cart",
            Self::BeginCheckout => "Begin Checkout",
            Self::Purchase => "Purchase",
        }
    }

    /// Match an event name exactly (case-sensitive).
    #[must_use]
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.event_name() == name)
    }
}

// =============================================================================
// Date Window and Queries
// =============================================================================

/// Date range in GA4 relative date syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindow {
    /// Start date (e.g., "90daysAgo", "2024-01-01").
    pub start_date: String,
    /// End date (e.g., "today", "2024-03-31").
    pub end_date: String,
}

impl Default for ReportWindow {
    fn default() -> Self {
        Self::trailing_days(TRAILING_WINDOW_DAYS)
    }
}

impl ReportWindow {
    /// Create a window covering the last N days up to today.
    #[must_use]
    pub fn trailing_days(days: u32) -> Self {
        Self {
            start_date: format!("{days}daysAgo"),
            end_date: "today".to_string(),
        }
    }

    /// Create a window for a specific period.
    #[must_use]
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Restricts a dimension to a fixed list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    /// The dimension being filtered.
    pub field_name: String,
    /// Accepted values (exact match).
    pub in_list: Vec<String>,
}

/// Description of the report request that produces one audit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Which audit table this query fills.
    pub kind: ReportKind,
    /// Date range to request.
    pub date_range: ReportWindow,
    /// Dimension names, in request order.
    pub dimensions: Vec<String>,
    /// Metric names, in request order.
    pub metrics: Vec<String>,
    /// Optional dimension filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<DimensionFilter>,
}

/// The query catalog for a full audit over `window`.
#[must_use]
pub fn audit_queries(window: &ReportWindow) -> Vec<ReportQuery> {
    ReportKind::ALL
        .into_iter()
        .map(|kind| kind.query(window))
        .collect()
}

// =============================================================================
// Rows and Values
// =============================================================================

/// A decoded metric value.
///
/// The API reports every metric as a string; the client decodes counts to
/// integers and currency amounts to floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
}

/// 2^64, the smallest float that does not fit in a `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

impl MetricValue {
    /// Interpret the value as a non-negative whole count.
    ///
    /// # Errors
    ///
    /// Returns a reason if the value is negative, fractional, non-finite or
    /// does not fit in a `u64`.
    // Whole, finite floats in [0, 2^64) convert exactly.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(self) -> Result<u64, &'static str> {
        match self {
            Self::Integer(value) => u64::try_from(value).map_err(|_| "count is negative"),
            Self::Float(value) if !value.is_finite() => Err("count is not finite"),
            Self::Float(value) if value < 0.0 => Err("count is negative"),
            Self::Float(value) if value.fract() != 0.0 => Err("count is not a whole number"),
            Self::Float(value) if value >= U64_LIMIT => Err("count is out of range"),
            Self::Float(value) => Ok(value as u64),
        }
    }

    /// Interpret the value as a currency amount.
    ///
    /// # Errors
    ///
    /// Returns a reason if the value cannot be represented as a decimal.
    pub fn as_amount(self) -> Result<Decimal, &'static str> {
        match self {
            Self::Integer(value) => Ok(Decimal::from(value)),
            Self::Float(value) => {
                Decimal::try_from(value).map_err(|_| "amount is not a finite decimal")
            }
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One decoded record from the reporting API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Dimension values, in the table's declared dimension order.
    #[serde(default)]
    pub dimension_values: Vec<String>,
    /// Metric values, in the table's declared metric order.
    #[serde(default)]
    pub metric_values: Vec<MetricValue>,
}

impl ReportRow {
    /// Create a row from dimension and metric values.
    #[must_use]
    pub fn new<D, M>(dimensions: D, metrics: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<MetricValue>,
    {
        Self {
            dimension_values: dimensions.into_iter().map(Into::into).collect(),
            metric_values: metrics.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

/// The rows of one logical query plus the schema they were decoded with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    /// Which audit table this is.
    pub kind: ReportKind,
    /// Declared dimension names, in row order.
    #[serde(default)]
    pub dimension_headers: Vec<String>,
    /// Declared metric names, in row order.
    #[serde(default)]
    pub metric_headers: Vec<String>,
    /// The decoded rows.
    #[serde(default)]
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Create an empty table with an explicit schema.
    #[must_use]
    pub fn new<D, M>(kind: ReportKind, dimension_headers: D, metric_headers: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            kind,
            dimension_headers: dimension_headers.into_iter().map(Into::into).collect(),
            metric_headers: metric_headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create an empty table declaring exactly the columns `kind` requires.
    #[must_use]
    pub fn with_standard_schema(kind: ReportKind) -> Self {
        Self::new(
            kind,
            kind.required_dimensions().iter().copied(),
            kind.required_metrics().iter().copied(),
        )
    }

    /// Append a row, builder style.
    #[must_use]
    pub fn with_row(mut self, row: ReportRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Append a row.
    pub fn push_row(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the index of a dimension by name.
    #[must_use]
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimension_headers.iter().position(|h| h == name)
    }

    /// Get the index of a metric by name.
    #[must_use]
    pub fn metric_index(&self, name: &str) -> Option<usize> {
        self.metric_headers.iter().position(|h| h == name)
    }

    /// Check that this is a `expected` table with a well-formed schema.
    ///
    /// # Errors
    ///
    /// - [`AuditError::WrongTable`] if the table carries another kind tag
    /// - [`AuditError::MalformedInput`] if a required column is not declared
    /// - [`AuditError::RowShape`] if a row does not match the declared schema
    pub fn validate_as(&self, expected: ReportKind) -> Result<(), AuditError> {
        if self.kind != expected {
            return Err(AuditError::WrongTable {
                expected,
                found: self.kind,
            });
        }
        self.validate()
    }

    /// Check the declared schema against this table's kind and every row
    /// against the declared schema.
    ///
    /// # Errors
    ///
    /// - [`AuditError::MalformedInput`] if a required column is not declared
    /// - [`AuditError::RowShape`] if a row does not match the declared schema
    pub fn validate(&self) -> Result<(), AuditError> {
        for field in self.kind.required_dimensions() {
            self.dimension(field)?;
        }
        for field in self.kind.required_metrics() {
            self.metric(field)?;
        }

        let expected_dimensions = self.dimension_headers.len();
        let expected_metrics = self.metric_headers.len();

        for (row, values) in self.rows.iter().enumerate() {
            let found_dimensions = values.dimension_values.len();
            let found_metrics = values.metric_values.len();
            if found_dimensions != expected_dimensions || found_metrics != expected_metrics {
                return Err(AuditError::RowShape {
                    table: self.kind,
                    row,
                    expected_dimensions,
                    expected_metrics,
                    found_dimensions,
                    found_metrics,
                });
            }
        }

        Ok(())
    }

    /// Locate a declared dimension column.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MalformedInput`] if the dimension is not declared.
    pub fn dimension(&self, field: &'static str) -> Result<DimensionColumn, AuditError> {
        self.dimension_index(field)
            .map(|index| DimensionColumn {
                table: self.kind,
                field,
                index,
            })
            .ok_or(AuditError::MalformedInput {
                table: self.kind,
                role: ColumnRole::Dimension,
                field,
            })
    }

    /// Locate a metric column the table may or may not declare.
    #[must_use]
    pub fn optional_metric(&self, field: &'static str) -> Option<MetricColumn> {
        self.metric_index(field).map(|index| MetricColumn {
            table: self.kind,
            field,
            index,
        })
    }

    /// Locate a declared metric column.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::MalformedInput`] if the metric is not declared.
    pub fn metric(&self, field: &'static str) -> Result<MetricColumn, AuditError> {
        self.metric_index(field)
            .map(|index| MetricColumn {
                table: self.kind,
                field,
                index,
            })
            .ok_or(AuditError::MalformedInput {
                table: self.kind,
                role: ColumnRole::Metric,
                field,
            })
    }
}

// =============================================================================
// Column Accessors
// =============================================================================

/// A resolved dimension column of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionColumn {
    table: ReportKind,
    field: &'static str,
    index: usize,
}

impl DimensionColumn {
    /// Read this column's value from `row` (the `row_index`-th row).
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidValue`] if the row is too short.
    pub fn text<'r>(&self, row_index: usize, row: &'r ReportRow) -> Result<&'r str, AuditError> {
        row.dimension_values
            .get(self.index)
            .map(String::as_str)
            .ok_or(AuditError::InvalidValue {
                table: self.table,
                field: self.field,
                row: row_index,
                reason: "value is missing",
            })
    }
}

/// A resolved metric column of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricColumn {
    table: ReportKind,
    field: &'static str,
    index: usize,
}

impl MetricColumn {
    /// Read this column as a count.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidValue`] if the value is missing or not a
    /// non-negative whole number.
    pub fn count(&self, row_index: usize, row: &ReportRow) -> Result<u64, AuditError> {
        self.value(row_index, row)?
            .as_count()
            .map_err(|reason| self.invalid(row_index, reason))
    }

    /// Read this column as a currency amount.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidValue`] if the value is missing or not a
    /// finite number.
    pub fn amount(&self, row_index: usize, row: &ReportRow) -> Result<Decimal, AuditError> {
        self.value(row_index, row)?
            .as_amount()
            .map_err(|reason| self.invalid(row_index, reason))
    }

    /// Build an [`AuditError::InvalidValue`] for this column.
    #[must_use]
    pub const fn invalid(&self, row_index: usize, reason: &'static str) -> AuditError {
        AuditError::InvalidValue {
            table: self.table,
            field: self.field,
            row: row_index,
            reason,
        }
    }

    fn value(&self, row_index: usize, row: &ReportRow) -> Result<MetricValue, AuditError> {
        row.metric_values
            .get(self.index)
            .copied()
            .ok_or_else(|| self.invalid(row_index, "value is missing"))
    }
}
