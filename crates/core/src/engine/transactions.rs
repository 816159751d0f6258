//! Transactions, revenue and duplicate detection.

use std::collections::BTreeMap;

use crate::error::AuditError;
use crate::types::{
    DuplicateTransaction, ReportKind, ReportTable, Revenue, TransactionId, TransactionSummary,
    fields,
};

/// Total revenue and transactions, and the IDs recorded more than once.
///
/// When the table declares the `transactions` metric each row stands for that
/// many transactions, which is how the API reports an ID recorded several
/// times. Without it every row counts as one transaction. Either way an ID's
/// occurrences are summed across rows. Duplicates are ordered by descending
/// count, ties by ID.
///
/// # Errors
///
/// Returns an [`AuditError`] if the table is not a well-formed
/// [`ReportKind::Transactions`] table, a value cannot be read, or a total
/// overflows.
pub fn analyze(table: &ReportTable) -> Result<TransactionSummary, AuditError> {
    table.validate_as(ReportKind::Transactions)?;

    let id = table.dimension(fields::TRANSACTION_ID)?;
    let revenue = table.metric(fields::TOTAL_REVENUE)?;
    let transaction_count = table.optional_metric(fields::TRANSACTIONS);

    let mut total_revenue = Revenue::ZERO;
    let mut total_transactions = 0_u64;
    let mut occurrences: BTreeMap<&str, u64> = BTreeMap::new();

    for (index, row) in table.rows.iter().enumerate() {
        let amount = revenue.amount(index, row)?;
        total_revenue = total_revenue
            .checked_add(amount)
            .ok_or_else(|| revenue.invalid(index, "revenue total is out of range"))?;

        let transactions = match &transaction_count {
            Some(column) => column.count(index, row)?,
            None => 1,
        };
        total_transactions = total_transactions.checked_add(transactions).ok_or_else(|| {
            transaction_count
                .as_ref()
                .unwrap_or(&revenue)
                .invalid(index, "transaction total is out of range")
        })?;
        // Bounded by the grand total.
        *occurrences.entry(id.text(index, row)?).or_default() += transactions;
    }

    let mut duplicates: Vec<DuplicateTransaction> = occurrences
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| DuplicateTransaction {
            transaction_id: TransactionId::from(id),
            count,
        })
        .collect();
    duplicates.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });

    Ok(TransactionSummary {
        total_transactions,
        total_revenue,
        duplicates,
    })
}
