use crate::schema::{AgingCategory, AuditSummary, DebtorExposure, InvoiceRecord};
use log::debug;
use std::collections::HashMap;

pub const TOP_DEBTOR_LIMIT: usize = 5;

/// Folds a parsed population into totals, an aging profile and a debtor ranking.
///
/// Debtors are keyed on the customer display name, so two customer IDs that
/// share a name are reported as one debtor.
pub fn calculate_audit_stats(records: &[InvoiceRecord]) -> AuditSummary {
    let mut summary = AuditSummary::empty();

    // Insertion-ordered so the stable sort below breaks ties by first appearance.
    let mut debtors: Vec<DebtorExposure> = Vec::new();
    let mut debtor_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let exposure = record.net_exposure();

        summary.total_receivable += record.billed_amount;
        summary.total_collections += record.amount_received;
        summary.net_exposure += exposure;

        if record.aging_bucket == AgingCategory::BadDebt {
            summary.bad_debt_potential += exposure;
        }

        *summary
            .aging_profile
            .entry(record.aging_bucket)
            .or_insert(0.0) += exposure;

        match debtor_index.get(record.customer_name.as_str()) {
            Some(&i) => debtors[i].amount += exposure,
            None => {
                debtor_index.insert(record.customer_name.as_str(), debtors.len());
                debtors.push(DebtorExposure {
                    name: record.customer_name.clone(),
                    amount: exposure,
                });
            }
        }
    }

    debug!(
        "Aggregated {} invoices across {} distinct debtors",
        records.len(),
        debtors.len()
    );

    debtors.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    debtors.truncate(TOP_DEBTOR_LIMIT);
    summary.top_debtors = debtors;

    summary
}
