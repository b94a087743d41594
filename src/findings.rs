//! Row-level classification used by the findings table: risk level,
//! confirmation outcome and the quick filters auditors apply to the population.

use crate::schema::InvoiceRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_overdue_days(days: u32) -> Self {
        if days > 90 {
            RiskLevel::High
        } else if days > 60 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    Confirmed,
    NoReply,
    Other(String),
}

impl ConfirmationStatus {
    pub fn classify(status: &str) -> Self {
        let lowered = status.to_lowercase();
        if lowered.contains("confirmed") {
            ConfirmationStatus::Confirmed
        } else if lowered.contains("no reply") {
            ConfirmationStatus::NoReply
        } else {
            ConfirmationStatus::Other(status.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingsFilter {
    #[default]
    All,
    /// Invoices older than 90 days.
    HighRisk,
    /// Confirmation requests the customer never answered.
    NoReply,
}

impl FindingsFilter {
    pub fn matches(&self, record: &InvoiceRecord) -> bool {
        match self {
            FindingsFilter::All => true,
            FindingsFilter::HighRisk => record.overdue_days > 90,
            FindingsFilter::NoReply => record
                .confirmation_status
                .to_lowercase()
                .contains("no reply"),
        }
    }
}

impl InvoiceRecord {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_overdue_days(self.overdue_days)
    }

    pub fn confirmation(&self) -> ConfirmationStatus {
        ConfirmationStatus::classify(&self.confirmation_status)
    }
}

pub fn filter_findings(records: &[InvoiceRecord], filter: FindingsFilter) -> Vec<&InvoiceRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AgingCategory;

    fn record(name: &str, days: u32, status: &str) -> InvoiceRecord {
        InvoiceRecord {
            customer_id: name.to_uppercase(),
            customer_name: name.to_string(),
            invoice_number: format!("INV-{}", name),
            invoice_date: None,
            due_date: None,
            billed_amount: 100.0,
            amount_received: 0.0,
            payment_date: None,
            confirmation_status: status.to_string(),
            overdue_days: days,
            aging_bucket: AgingCategory::from_overdue_days(days),
        }
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_overdue_days(60), RiskLevel::Low);
        assert_eq!(RiskLevel::from_overdue_days(61), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_overdue_days(90), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_overdue_days(91), RiskLevel::High);
    }

    #[test]
    fn test_confirmation_classification() {
        assert_eq!(
            ConfirmationStatus::classify("Confirmed - Match"),
            ConfirmationStatus::Confirmed
        );
        assert_eq!(
            ConfirmationStatus::classify("NO REPLY"),
            ConfirmationStatus::NoReply
        );
        assert_eq!(
            ConfirmationStatus::classify("Disputed"),
            ConfirmationStatus::Other("Disputed".to_string())
        );
    }

    #[test]
    fn test_filters_keep_order() {
        let records = vec![
            record("a", 120, "No Reply"),
            record("b", 10, "Confirmed"),
            record("c", 95, "Confirmed"),
            record("d", 40, "no reply yet"),
        ];

        let all = filter_findings(&records, FindingsFilter::All);
        assert_eq!(all.len(), 4);

        let high: Vec<&str> = filter_findings(&records, FindingsFilter::HighRisk)
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect();
        assert_eq!(high, vec!["a", "c"]);

        let no_reply: Vec<&str> = filter_findings(&records, FindingsFilter::NoReply)
            .iter()
            .map(|r| r.customer_name.as_str())
            .collect();
        assert_eq!(no_reply, vec!["a", "d"]);

        assert_eq!(records[0].risk_level(), RiskLevel::High);
        assert_eq!(records[1].confirmation(), ConfirmationStatus::Confirmed);
    }
}
