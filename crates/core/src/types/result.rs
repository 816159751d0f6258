//! The audit result aggregate.
//!
//! Unavailable values (a ratio or rate whose denominator is zero) are `None`,
//! never `0.0`, so consumers can tell "0%" apart from "undefined".

use serde::{Deserialize, Serialize};

use super::{FunnelStage, InsightFlag, InsightKind, ReportWindow, Revenue, TransactionId};

// =============================================================================
// Sessions and Users
// =============================================================================

/// Session and user totals over the report window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionsSummary {
    /// Total sessions.
    pub total_sessions: u64,
    /// Total users.
    pub total_users: u64,
    /// Sessions per user; `None` when there are no users.
    pub sessions_per_user: Option<f64>,
}

// =============================================================================
// Unassigned Traffic
// =============================================================================

/// Unassigned sessions for one session medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediumSessions {
    /// The session medium (e.g., "(not set)", "referral").
    pub medium: String,
    /// Unassigned sessions with this medium.
    pub sessions: u64,
}

/// Sessions GA4 could not attribute to a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnassignedTraffic {
    /// Sessions in the "Unassigned" channel group.
    pub unassigned_sessions: u64,
    /// Share of total sessions, in percent; 0 when there are no sessions.
    pub unassigned_percent: f64,
    /// Per-medium breakdown, highest count first, ties by medium name.
    pub mediums: Vec<MediumSessions>,
}

// =============================================================================
// Transactions and Revenue
// =============================================================================

/// A transaction ID recorded more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTransaction {
    /// The repeated ID.
    pub transaction_id: TransactionId,
    /// How many rows carried this ID (always greater than 1).
    pub count: u64,
}

/// Transaction volume, revenue and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Transaction rows, duplicates included.
    pub total_transactions: u64,
    /// Sum of revenue over every row.
    pub total_revenue: Revenue,
    /// Repeated IDs, highest count first, ties by ID.
    pub duplicates: Vec<DuplicateTransaction>,
}

impl TransactionSummary {
    /// Whether any transaction ID was recorded more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

// =============================================================================
// Conversion Funnel
// =============================================================================

/// Event counts per funnel stage. Stages with no rows count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelCounts {
    pub view_item: u64,
    pub add_to_cart: u64,
    pub begin_checkout: u64,
    pub purchase: u64,
}

impl FunnelCounts {
    /// Count for one stage.
    #[must_use]
    pub const fn get(&self, stage: FunnelStage) -> u64 {
        match stage {
            FunnelStage::ViewItem => self.view_item,
            FunnelStage::AddToCart => self.add_to_cart,
            FunnelStage::BeginCheckout => self.begin_checkout,
            FunnelStage::Purchase => self.purchase,
        }
    }

    /// Add events to one stage, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(mut self, stage: FunnelStage, events: u64) -> Option<Self> {
        let slot = match stage {
            FunnelStage::ViewItem => &mut self.view_item,
            FunnelStage::AddToCart => &mut self.add_to_cart,
            FunnelStage::BeginCheckout => &mut self.begin_checkout,
            FunnelStage::Purchase => &mut self.purchase,
        };
        *slot = slot.checked_add(events)?;
        Some(self)
    }
}

/// Stage-to-stage conversion rates, in percent.
///
/// A rate is `None` when the earlier stage has no events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelRates {
    pub view_to_cart: Option<f64>,
    pub cart_to_checkout: Option<f64>,
    pub checkout_to_purchase: Option<f64>,
    pub view_to_purchase: Option<f64>,
}

/// Funnel stage counts and conversion rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelSummary {
    pub counts: FunnelCounts,
    pub rates: FunnelRates,
}

// =============================================================================
// Audit Result
// =============================================================================

/// Everything one audit run computes.
///
/// Built once per run by [`crate::AuditEngine::run`]; identical inputs always
/// produce identical results, ordering included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// The window the input tables cover.
    pub window: ReportWindow,
    /// Session and user totals.
    pub sessions: SessionsSummary,
    /// Unassigned traffic analysis.
    pub unassigned: UnassignedTraffic,
    /// Transaction and revenue analysis.
    pub transactions: TransactionSummary,
    /// Conversion funnel analysis.
    pub funnel: FunnelSummary,
    /// Insight flags, in rule order.
    pub flags: Vec<InsightFlag>,
}

impl AuditResult {
    /// Whether the audit raised no flags.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether a flag of `kind` was raised.
    #[must_use]
    pub fn has_flag(&self, kind: InsightKind) -> bool {
        self.flags.iter().any(|flag| flag.kind == kind)
    }

    /// All flags of `kind`.
    pub fn flags_of(&self, kind: InsightKind) -> impl Iterator<Item = &InsightFlag> {
        self.flags.iter().filter(move |flag| flag.kind == kind)
    }
}
