//! # Receivables Audit
//!
//! A library for turning an accounts-receivable invoice export (CSV) into the
//! figures an auditor works from: per-invoice aging, an aging profile, bad-debt
//! exposure and the customers with the largest outstanding balances.
//!
//! ## Core Concepts
//!
//! - **Invoice Record**: One parsed CSV row plus its derived age in days and aging bucket
//! - **Audit Reference Date**: The balance sheet date invoice age is measured against.
//!   It is always passed in explicitly, never taken from the clock
//! - **Aging Bucket**: 0-30, 31-60, 61-90 and >90 days (bad debt)
//! - **Net Exposure**: Billed minus received, per invoice or in total
//! - **Permissive Ingestion**: A malformed amount or date degrades that field instead of
//!   rejecting the upload; only a missing header or an upload without rows fails
//!
//! With the `gemini` feature, [`llm::AuditAssistant`] relays the rendered data
//! context to Gemini for chat, voice questions and report drafting.
//!
//! ## Example
//!
//! ```rust
//! use receivables_audit::*;
//! use chrono::NaiveDate;
//!
//! let csv = "Customer_ID,Nama_Pelanggan,No_Invoice,Tanggal_Invoice,Tanggal_Jatuh_Tempo,Jumlah_Tagihan,Pembayaran_Diterima,Tanggal_Bayar,Status_Konfirmasi\n\
//!            Cust1,Acme,INV-1,2023-10-01,2023-11-01,1000000,400000,,Pending";
//!
//! let options = ParseOptions::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
//! let (records, summary) = audit_csv(csv, &options).unwrap();
//!
//! assert_eq!(records[0].aging_bucket, AgingCategory::BadDebt);
//! assert_eq!(summary.bad_debt_potential, 600_000.0);
//! ```

pub mod aggregator;
pub mod error;
pub mod findings;
pub mod ingestion;
pub mod narrative;
pub mod schema;
pub mod session;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use aggregator::{calculate_audit_stats, TOP_DEBTOR_LIMIT};
pub use error::{AuditError, Result};
pub use findings::*;
pub use ingestion::*;
pub use narrative::{format_context, ChatRole, ChatTurn};
pub use schema::*;
pub use session::{AuditSession, UploadOutcome};
pub use utils::format_idr;

use log::{debug, info};

pub struct ReceivablesAuditor;

impl ReceivablesAuditor {
    pub fn process(
        text: &str,
        options: &ParseOptions,
    ) -> Result<(Vec<InvoiceRecord>, AuditSummary)> {
        debug!(
            "Auditing upload of {} bytes, dialect {:?}",
            text.len(),
            options.dialect
        );

        let records = parse_invoices(text, options)?;
        let summary = calculate_audit_stats(&records);

        info!(
            "Audit summary: receivable {}, collected {}, bad debt {}",
            summary.total_receivable, summary.total_collections, summary.bad_debt_potential
        );

        Ok((records, summary))
    }
}

/// Parses an upload and aggregates it in one call.
pub fn audit_csv(
    text: &str,
    options: &ParseOptions,
) -> Result<(Vec<InvoiceRecord>, AuditSummary)> {
    ReceivablesAuditor::process(text, options)
}
