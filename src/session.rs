use crate::aggregator::calculate_audit_stats;
use crate::error::Result;
use crate::ingestion::{parse_invoices_with_report, Column, RowDiagnostic};
use crate::schema::{AuditSummary, InvoiceRecord, ParseOptions};
use log::{info, warn};

/// What an accepted upload looked like, for the upload screen.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub rows: usize,
    pub degraded_rows: usize,
    pub diagnostics: Vec<RowDiagnostic>,
    pub missing_columns: Vec<Column>,
}

/// The dataset currently under review. A new upload replaces it wholesale;
/// a rejected upload leaves the previous dataset in place.
#[derive(Debug, Clone, Default)]
pub struct AuditSession {
    options: ParseOptions,
    records: Vec<InvoiceRecord>,
    summary: Option<AuditSummary>,
}

impl AuditSession {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            records: Vec::new(),
            summary: None,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    /// `None` until an upload has been accepted.
    pub fn summary(&self) -> Option<&AuditSummary> {
        self.summary.as_ref()
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn load_csv(&mut self, text: &str) -> Result<UploadOutcome> {
        let report = match parse_invoices_with_report(text, &self.options) {
            Ok(report) => report,
            Err(e) => {
                warn!("Upload rejected, keeping previous dataset: {}", e);
                return Err(e);
            }
        };

        let summary = calculate_audit_stats(&report.records);
        info!(
            "Loaded {} invoices, net exposure {}",
            report.records.len(),
            summary.net_exposure
        );

        let outcome = UploadOutcome {
            rows: report.records.len(),
            degraded_rows: report.degraded_rows(),
            diagnostics: report.diagnostics,
            missing_columns: report.missing_columns,
        };

        self.records = report.records;
        self.summary = Some(summary);

        Ok(outcome)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.summary = None;
    }
}
