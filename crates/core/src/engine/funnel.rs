//! Conversion funnel analysis.

use crate::error::AuditError;
use crate::types::{
    FunnelCounts, FunnelRates, FunnelStage, FunnelSummary, ReportKind, ReportTable, fields,
};

use super::percent;

/// Count events per funnel stage and compute stage-to-stage conversion rates.
///
/// Rows for events outside the funnel are ignored; a funnel event with no
/// rows counts as zero. A rate is unavailable when its earlier stage is zero.
///
/// # Errors
///
/// Returns an [`AuditError`] if the table is not a well-formed
/// [`ReportKind::FunnelEvents`] table, an event count cannot be read, or a
/// stage total overflows.
pub fn analyze(table: &ReportTable) -> Result<FunnelSummary, AuditError> {
    table.validate_as(ReportKind::FunnelEvents)?;

    let event = table.dimension(fields::EVENT_NAME)?;
    let event_count = table.metric(fields::EVENT_COUNT)?;

    let mut counts = FunnelCounts::default();
    for (index, row) in table.rows.iter().enumerate() {
        let events = event_count.count(index, row)?;
        if let Some(stage) = FunnelStage::from_event_name(event.text(index, row)?) {
            counts = counts
                .checked_add(stage, events)
                .ok_or_else(|| event_count.invalid(index, "event total is out of range"))?;
        }
    }

    Ok(FunnelSummary {
        counts,
        rates: conversion_rates(&counts),
    })
}

/// Conversion rates between consecutive stages, plus view to purchase.
#[must_use]
pub fn conversion_rates(counts: &FunnelCounts) -> FunnelRates {
    FunnelRates {
        view_to_cart: percent(counts.add_to_cart, counts.view_item),
        cart_to_checkout: percent(counts.begin_checkout, counts.add_to_cart),
        checkout_to_purchase: percent(counts.purchase, counts.begin_checkout),
        view_to_purchase: percent(counts.purchase, counts.view_item),
    }
}
