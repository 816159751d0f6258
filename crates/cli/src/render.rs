//! Plain-text audit report.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use ga4_audit_core::{AuditResult, ExportSection, ExportValue, FunnelStage, group_thousands};

/// Duplicate transaction IDs listed before the rest are summarized.
pub const MAX_LISTED_DUPLICATES: usize = 10;

/// Write the sectioned text report for `result`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_text_report<W: Write>(
    out: &mut W,
    result: &AuditResult,
    generated_at: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "GA4 AUDIT RESULTS")?;
    writeln!(
        out,
        "Window: {} to {}",
        result.window.start_date, result.window.end_date
    )?;
    writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    write_sessions(out, result)?;
    write_unassigned(out, result)?;
    write_transactions(out, result)?;
    write_funnel(out, result)?;
    write_insights(out, result)
}

fn heading<W: Write>(out: &mut W, section: ExportSection) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", section.title())
}

fn write_sessions<W: Write>(out: &mut W, result: &AuditResult) -> io::Result<()> {
    let sessions = &result.sessions;
    heading(out, ExportSection::SessionsAndUsers)?;
    writeln!(
        out,
        "  Total Sessions: {}",
        group_thousands(sessions.total_sessions)
    )?;
    writeln!(out, "  Total Users: {}", group_thousands(sessions.total_users))?;
    writeln!(
        out,
        "  Sessions per User: {}",
        ExportValue::Ratio(sessions.sessions_per_user)
    )
}

fn write_unassigned<W: Write>(out: &mut W, result: &AuditResult) -> io::Result<()> {
    let unassigned = &result.unassigned;
    heading(out, ExportSection::UnassignedTraffic)?;
    writeln!(
        out,
        "  Unassigned Sessions: {}",
        group_thousands(unassigned.unassigned_sessions)
    )?;
    writeln!(
        out,
        "  Percent of Total: {}",
        ExportValue::Percent(Some(unassigned.unassigned_percent))
    )?;

    if unassigned.mediums.is_empty() {
        return writeln!(out, "  No unassigned traffic found");
    }
    writeln!(out, "  Session Medium Breakdown (Unassigned Traffic):")?;
    for medium in &unassigned.mediums {
        writeln!(
            out,
            "    - {}: {} sessions",
            medium.medium,
            group_thousands(medium.sessions)
        )?;
    }
    Ok(())
}

fn write_transactions<W: Write>(out: &mut W, result: &AuditResult) -> io::Result<()> {
    let transactions = &result.transactions;
    heading(out, ExportSection::TransactionsAndRevenue)?;
    writeln!(
        out,
        "  Total Transactions: {}",
        group_thousands(transactions.total_transactions)
    )?;
    writeln!(
        out,
        "  Total Revenue: {}",
        transactions.total_revenue.display()
    )?;

    if !transactions.has_duplicates() {
        return writeln!(out, "  No duplicate transaction IDs found");
    }
    writeln!(out, "  Transaction IDs with >1 Transaction:")?;
    for duplicate in transactions.duplicates.iter().take(MAX_LISTED_DUPLICATES) {
        writeln!(
            out,
            "    - {}: {} transactions",
            duplicate.transaction_id, duplicate.count
        )?;
    }
    let hidden = transactions
        .duplicates
        .len()
        .saturating_sub(MAX_LISTED_DUPLICATES);
    if hidden > 0 {
        writeln!(out, "    ... and {hidden} more")?;
    }
    Ok(())
}

fn write_funnel<W: Write>(out: &mut W, result: &AuditResult) -> io::Result<()> {
    let funnel = &result.funnel;
    heading(out, ExportSection::ConversionFunnel)?;
    for stage in FunnelStage::ALL {
        writeln!(
            out,
            "  {}: {}",
            stage.label(),
            group_thousands(funnel.counts.get(stage))
        )?;
    }

    let rates = [
        ("View → Cart", funnel.rates.view_to_cart),
        ("Cart → Checkout", funnel.rates.cart_to_checkout),
        ("Checkout → Purchase", funnel.rates.checkout_to_purchase),
        ("View → Purchase", funnel.rates.view_to_purchase),
    ];
    writeln!(out, "  Funnel Conversion Rates:")?;
    for (label, rate) in rates {
        writeln!(out, "    {label}: {}", ExportValue::Percent(rate))?;
    }
    Ok(())
}

fn write_insights<W: Write>(out: &mut W, result: &AuditResult) -> io::Result<()> {
    heading(out, ExportSection::Insights)?;
    if result.is_healthy() {
        return writeln!(out, "  ✅ All metrics look healthy!");
    }
    for flag in &result.flags {
        writeln!(out, "  ⚠️ {}: {}", flag.kind.label(), flag.message)?;
    }
    Ok(())
}
