use crate::error::{AuditError, Result};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Balance sheet date assumed by the audit when no other date is configured.
pub const DEFAULT_REFERENCE_DATE: (i32, u32, u32) = (2023, 12, 31);

pub fn default_reference_date() -> NaiveDate {
    let (year, month, day) = DEFAULT_REFERENCE_DATE;
    NaiveDate::from_ymd_opt(year, month, day).expect("default reference date is a valid date")
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgingCategory {
    #[schemars(description = "0-30 days since invoice date. Considered current (lancar).")]
    Current,

    #[serde(rename = "PAST_DUE_1")]
    #[schemars(description = "31-60 days since invoice date (kurang lancar).")]
    PastDue1,

    #[serde(rename = "PAST_DUE_2")]
    #[schemars(description = "61-90 days since invoice date (diragukan).")]
    PastDue2,

    #[schemars(description = "More than 90 days since invoice date (macet). Candidate for impairment allowance.")]
    BadDebt,
}

impl AgingCategory {
    pub const ALL: [AgingCategory; 4] = [
        AgingCategory::Current,
        AgingCategory::PastDue1,
        AgingCategory::PastDue2,
        AgingCategory::BadDebt,
    ];

    /// Thresholds are strict: exactly 90 days is still `PastDue2`.
    pub fn from_overdue_days(days: u32) -> Self {
        if days > 90 {
            AgingCategory::BadDebt
        } else if days > 60 {
            AgingCategory::PastDue2
        } else if days > 30 {
            AgingCategory::PastDue1
        } else {
            AgingCategory::Current
        }
    }

    /// Label used on the aging chart and in drafted reports.
    pub fn label(&self) -> &'static str {
        match self {
            AgingCategory::Current => "0-30 Hari (Lancar)",
            AgingCategory::PastDue1 => "31-60 Hari (Kurang Lancar)",
            AgingCategory::PastDue2 => "61-90 Hari (Diragukan)",
            AgingCategory::BadDebt => "> 90 Hari (Macet)",
        }
    }
}

impl fmt::Display for AgingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the receivables population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceRecord {
    #[schemars(description = "Customer identifier (Customer_ID)")]
    pub customer_id: String,

    #[schemars(description = "Customer display name (Nama_Pelanggan). Debtor ranking keys on this.")]
    pub customer_name: String,

    #[schemars(description = "Invoice number (No_Invoice)")]
    pub invoice_number: String,

    #[schemars(description = "Invoice date (Tanggal_Invoice). None when missing or unparseable.")]
    pub invoice_date: Option<NaiveDate>,

    #[schemars(description = "Due date (Tanggal_Jatuh_Tempo)")]
    pub due_date: Option<NaiveDate>,

    #[schemars(description = "Billed amount (Jumlah_Tagihan), never negative")]
    pub billed_amount: f64,

    #[schemars(description = "Amount received (Pembayaran_Diterima), never negative")]
    pub amount_received: f64,

    #[schemars(description = "Payment date (Tanggal_Bayar). None when unpaid.")]
    pub payment_date: Option<NaiveDate>,

    #[schemars(description = "Free-text confirmation status (Status_Konfirmasi), e.g. 'Confirmed', 'No Reply'")]
    pub confirmation_status: String,

    #[schemars(description = "Whole days between the invoice date and the audit reference date")]
    pub overdue_days: u32,

    pub aging_bucket: AgingCategory,
}

impl InvoiceRecord {
    pub fn net_exposure(&self) -> f64 {
        self.billed_amount - self.amount_received
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DebtorExposure {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditSummary {
    #[schemars(description = "Sum of all billed amounts")]
    pub total_receivable: f64,

    #[schemars(description = "Sum of all amounts received")]
    pub total_collections: f64,

    #[schemars(description = "Billed minus received, summed over every invoice")]
    pub net_exposure: f64,

    #[schemars(description = "Net exposure of invoices aged more than 90 days")]
    pub bad_debt_potential: f64,

    #[schemars(description = "Net exposure per aging bucket. Always contains all four buckets.")]
    pub aging_profile: BTreeMap<AgingCategory, f64>,

    #[schemars(description = "Up to five customers with the largest net exposure, descending")]
    pub top_debtors: Vec<DebtorExposure>,
}

impl AuditSummary {
    pub fn empty() -> Self {
        Self {
            total_receivable: 0.0,
            total_collections: 0.0,
            net_exposure: 0.0,
            bad_debt_potential: 0.0,
            aging_profile: AgingCategory::ALL.iter().map(|c| (*c, 0.0)).collect(),
            top_debtors: Vec::new(),
        }
    }

    pub fn aging_amount(&self, category: AgingCategory) -> f64 {
        self.aging_profile.get(&category).copied().unwrap_or(0.0)
    }

    /// Combined exposure of the ranked debtors.
    pub fn top_debtor_concentration(&self) -> f64 {
        self.top_debtors.iter().map(|d| d.amount).sum()
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AuditSummary)
    }

    pub fn schema_as_json() -> Result<String> {
        let schema = Self::generate_json_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CsvDialect {
    /// Split every line on commas. Embedded commas corrupt the row.
    #[default]
    Naive,

    /// RFC 4180 quoting, so `"PT Maju, Tbk"` stays one field.
    Quoted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ParseOptions {
    #[serde(default = "default_reference_date")]
    #[schemars(description = "Date against which invoice age is measured (YYYY-MM-DD)")]
    pub reference_date: NaiveDate,

    #[serde(default)]
    pub dialect: CsvDialect,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            reference_date: default_reference_date(),
            dialect: CsvDialect::Naive,
        }
    }
}

impl ParseOptions {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            ..Self::default()
        }
    }

    pub fn with_dialect(mut self, dialect: CsvDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AuditError::InvalidConfig(e.to_string()))
    }
}
