//! Turns uploaded receivables CSV text into [`InvoiceRecord`]s.
//!
//! Ingestion is permissive: a malformed amount or date degrades that field to
//! zero/empty instead of rejecting the upload. Only structural problems (no
//! header, no data rows) fail the whole file. Degradations are collected in an
//! [`IngestionReport`] for callers that want to surface them.

use crate::error::{AuditError, Result};
use crate::schema::{AgingCategory, CsvDialect, InvoiceRecord, ParseOptions};
use crate::utils::{days_between, parse_amount_checked, parse_date_lenient};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    CustomerId,
    CustomerName,
    InvoiceNumber,
    InvoiceDate,
    DueDate,
    BilledAmount,
    AmountReceived,
    PaymentDate,
    ConfirmationStatus,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::CustomerId,
        Column::CustomerName,
        Column::InvoiceNumber,
        Column::InvoiceDate,
        Column::DueDate,
        Column::BilledAmount,
        Column::AmountReceived,
        Column::PaymentDate,
        Column::ConfirmationStatus,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::CustomerId => "Customer_ID",
            Column::CustomerName => "Nama_Pelanggan",
            Column::InvoiceNumber => "No_Invoice",
            Column::InvoiceDate => "Tanggal_Invoice",
            Column::DueDate => "Tanggal_Jatuh_Tempo",
            Column::BilledAmount => "Jumlah_Tagihan",
            Column::AmountReceived => "Pembayaran_Diterima",
            Column::PaymentDate => "Tanggal_Bayar",
            Column::ConfirmationStatus => "Status_Konfirmasi",
        }
    }

    pub fn from_header(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Degradation {
    /// Amount cell was not a usable non-negative number; read as the leading
    /// numeric prefix or zero.
    InvalidAmount { raw: String, used: f64 },
    /// Date cell could not be read. For the invoice date this means the row
    /// falls back to zero overdue days.
    InvalidDate { raw: String },
    /// Row had fewer cells than the header.
    ShortRow { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    /// 1-based line number in the upload (the header is line 1).
    pub line: usize,
    pub column: Option<Column>,
    pub issue: Degradation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionReport {
    pub records: Vec<InvoiceRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
    /// Recognised columns absent from the header; their fields default to empty/zero.
    pub missing_columns: Vec<Column>,
}

impl IngestionReport {
    pub fn degraded_rows(&self) -> usize {
        self.diagnostics
            .iter()
            .map(|d| d.line)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.missing_columns.is_empty()
    }
}

struct RawTable {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

pub fn parse_invoices(text: &str, options: &ParseOptions) -> Result<Vec<InvoiceRecord>> {
    parse_invoices_with_report(text, options).map(|report| report.records)
}

pub fn parse_invoices_with_report(text: &str, options: &ParseOptions) -> Result<IngestionReport> {
    let table = match options.dialect {
        CsvDialect::Naive => split_naive(text)?,
        CsvDialect::Quoted => split_quoted(text)?,
    };

    let mut positions: HashMap<Column, usize> = HashMap::new();
    for (index, name) in table.header.iter().enumerate() {
        if let Some(column) = Column::from_header(name) {
            // A repeated header name maps to its last occurrence.
            positions.insert(column, index);
        }
    }

    let missing_columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| !positions.contains_key(c))
        .collect();
    if !missing_columns.is_empty() {
        warn!(
            "Upload header is missing columns: {}",
            missing_columns
                .iter()
                .map(|c| c.header())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut report = IngestionReport {
        records: Vec::with_capacity(table.rows.len()),
        diagnostics: Vec::new(),
        missing_columns,
    };

    for (line, values) in &table.rows {
        let record = build_record(
            *line,
            values,
            table.header.len(),
            &positions,
            options,
            &mut report.diagnostics,
        );
        report.records.push(record);
    }

    info!(
        "Parsed {} invoice rows ({} degraded) against reference date {}",
        report.records.len(),
        report.degraded_rows(),
        options.reference_date
    );

    Ok(report)
}

/// Drops a leading byte-order mark and surrounding whitespace. Also returns
/// how many whole lines were skipped at the top, so row numbers still point
/// at the original upload.
fn trim_upload(text: &str) -> (&str, usize) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let body = text.trim_start();
    let skipped_lines = text[..text.len() - body.len()].matches('\n').count();
    (body.trim_end(), skipped_lines)
}

fn split_naive(text: &str) -> Result<RawTable> {
    let (trimmed, skipped_lines) = trim_upload(text);
    if trimmed.is_empty() {
        return Err(AuditError::EmptyInput);
    }

    let mut lines = trimmed
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    let header_line = lines.next().ok_or(AuditError::EmptyInput)?;
    let header = split_line(header_line);

    let rows: Vec<(usize, Vec<String>)> = lines
        .enumerate()
        .map(|(i, line)| (skipped_lines + i + 2, split_line(line)))
        .collect();

    if rows.is_empty() {
        return Err(AuditError::NoDataRows(header_line.to_string()));
    }

    Ok(RawTable { header, rows })
}

fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|v| v.trim().to_string()).collect()
}

fn split_quoted(text: &str) -> Result<RawTable> {
    let (trimmed, skipped_lines) = trim_upload(text);
    if trimmed.is_empty() {
        return Err(AuditError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(trimmed.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = skipped_lines
            + record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 1);
        let values: Vec<String> = record.iter().map(|v| v.to_string()).collect();
        if header.is_none() {
            header = Some(values);
        } else {
            rows.push((line, values));
        }
    }

    let header = header.ok_or(AuditError::EmptyInput)?;
    if rows.is_empty() {
        return Err(AuditError::NoDataRows(header.join(",")));
    }

    Ok(RawTable { header, rows })
}

fn cell_value<'a>(
    values: &'a [String],
    positions: &HashMap<Column, usize>,
    column: Column,
) -> &'a str {
    positions
        .get(&column)
        .and_then(|&i| values.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

fn build_record(
    line: usize,
    values: &[String],
    header_len: usize,
    positions: &HashMap<Column, usize>,
    options: &ParseOptions,
    diagnostics: &mut Vec<RowDiagnostic>,
) -> InvoiceRecord {
    if values.len() < header_len {
        diagnostics.push(RowDiagnostic {
            line,
            column: None,
            issue: Degradation::ShortRow {
                expected: header_len,
                found: values.len(),
            },
        });
    }

    let cell = |column: Column| cell_value(values, positions, column);

    let mut amount = |column: Column| -> f64 {
        let raw = cell(column);
        let (used, exact) = parse_amount_checked(raw);
        if !exact {
            diagnostics.push(RowDiagnostic {
                line,
                column: Some(column),
                issue: Degradation::InvalidAmount {
                    raw: raw.to_string(),
                    used,
                },
            });
        }
        used
    };

    let billed_amount = amount(Column::BilledAmount);
    let amount_received = amount(Column::AmountReceived);

    let mut date = |column: Column, required: bool| {
        let raw = cell(column);
        let parsed = parse_date_lenient(raw);
        if parsed.is_none() && (required || !raw.is_empty()) {
            diagnostics.push(RowDiagnostic {
                line,
                column: Some(column),
                issue: Degradation::InvalidDate {
                    raw: raw.to_string(),
                },
            });
        }
        parsed
    };

    let invoice_date = date(Column::InvoiceDate, true);
    let due_date = date(Column::DueDate, false);
    let payment_date = date(Column::PaymentDate, false);

    let overdue_days = match invoice_date {
        Some(d) => days_between(options.reference_date, d),
        None => {
            debug!("Line {}: no usable invoice date, treating as 0 days old", line);
            0
        }
    };

    InvoiceRecord {
        customer_id: cell(Column::CustomerId).to_string(),
        customer_name: cell(Column::CustomerName).to_string(),
        invoice_number: cell(Column::InvoiceNumber).to_string(),
        invoice_date,
        due_date,
        billed_amount,
        amount_received,
        payment_date,
        confirmation_status: cell(Column::ConfirmationStatus).to_string(),
        overdue_days,
        aging_bucket: AgingCategory::from_overdue_days(overdue_days),
    }
}
