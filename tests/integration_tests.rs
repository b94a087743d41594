use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use receivables_audit::{
    audit_csv, calculate_audit_stats, filter_findings, format_context, format_idr,
    parse_invoices, parse_invoices_with_report, AgingCategory, AuditSession, DebtorExposure,
    FindingsFilter, ParseOptions, RiskLevel, TOP_DEBTOR_LIMIT,
};
use std::collections::HashSet;

const HEADER: &str = "Customer_ID,Nama_Pelanggan,No_Invoice,Tanggal_Invoice,Tanggal_Jatuh_Tempo,Jumlah_Tagihan,Pembayaran_Diterima,Tanggal_Bayar,Status_Konfirmasi";

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
}

fn options() -> ParseOptions {
    ParseOptions::new(reference())
}

fn csv_with_rows(rows: &[String]) -> String {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

#[derive(Debug, Clone)]
struct GeneratedRow {
    customer: usize,
    billed: u32,
    received_pct: u8,
    age_days: u64,
}

impl GeneratedRow {
    fn render(&self, index: usize) -> String {
        let invoice_date = reference().checked_sub_days(Days::new(self.age_days)).unwrap();
        let received = u64::from(self.billed) * u64::from(self.received_pct) / 100;
        format!(
            "C{},Customer {},INV-{},{},,{},{},,Pending",
            index,
            self.customer,
            index,
            invoice_date.format("%Y-%m-%d"),
            self.billed,
            received
        )
    }
}

fn generated_row() -> impl Strategy<Value = GeneratedRow> {
    (0usize..8, 0u32..10_000_000, 0u8..=100, 0u64..400).prop_map(
        |(customer, billed, received_pct, age_days)| GeneratedRow {
            customer,
            billed,
            received_pct,
            age_days,
        },
    )
}

proptest! {
    #[test]
    fn prop_every_data_line_yields_one_record(rows in prop::collection::vec(generated_row(), 1..60)) {
        let rendered: Vec<String> = rows.iter().enumerate().map(|(i, r)| r.render(i)).collect();
        let records = parse_invoices(&csv_with_rows(&rendered), &options()).unwrap();

        prop_assert_eq!(records.len(), rows.len());
        for (i, (record, row)) in records.iter().zip(&rows).enumerate() {
            prop_assert_eq!(&record.invoice_number, &format!("INV-{}", i));
            prop_assert_eq!(u64::from(record.overdue_days), row.age_days);
            prop_assert_eq!(record.aging_bucket, AgingCategory::from_overdue_days(record.overdue_days));
        }
    }

    #[test]
    fn prop_aging_profile_sums_to_net_exposure(rows in prop::collection::vec(generated_row(), 1..60)) {
        let rendered: Vec<String> = rows.iter().enumerate().map(|(i, r)| r.render(i)).collect();
        let (records, summary) = audit_csv(&csv_with_rows(&rendered), &options()).unwrap();

        let profile_total: f64 = summary.aging_profile.values().sum();
        let tolerance = 1e-6 * summary.net_exposure.abs().max(1.0);
        prop_assert!((profile_total - summary.net_exposure).abs() <= tolerance);
        prop_assert!(
            (summary.total_receivable - summary.total_collections - summary.net_exposure).abs() <= tolerance
        );
        prop_assert_eq!(summary.aging_profile.len(), 4);

        let names: HashSet<&str> = records.iter().map(|r| r.customer_name.as_str()).collect();
        prop_assert!(summary.top_debtors.len() <= TOP_DEBTOR_LIMIT);
        prop_assert!(summary.top_debtors.len() <= names.len());
        for pair in summary.top_debtors.windows(2) {
            prop_assert!(pair[0].amount >= pair[1].amount);
        }
        for debtor in &summary.top_debtors {
            prop_assert!(names.contains(debtor.name.as_str()));
        }
    }

    #[test]
    fn prop_bucket_is_a_function_of_days(days in 0u32..1000) {
        let expected = if days > 90 {
            AgingCategory::BadDebt
        } else if days > 60 {
            AgingCategory::PastDue2
        } else if days > 30 {
            AgingCategory::PastDue1
        } else {
            AgingCategory::Current
        };
        prop_assert_eq!(AgingCategory::from_overdue_days(days), expected);
    }
}

#[test]
fn test_acme_scenario() {
    let text = csv_with_rows(&[
        "Cust1, Acme, INV-1, 2023-10-01, 2023-11-01, 1000000, 400000, , Pending".to_string(),
    ]);
    let (records, summary) = audit_csv(&text, &options()).unwrap();

    assert_eq!(records[0].overdue_days, 91);
    assert_eq!(records[0].aging_bucket, AgingCategory::BadDebt);
    assert_eq!(summary.net_exposure, 600_000.0);
    assert_eq!(summary.bad_debt_potential, 600_000.0);
    assert_eq!(summary.aging_amount(AgingCategory::BadDebt), 600_000.0);
    for category in [
        AgingCategory::Current,
        AgingCategory::PastDue1,
        AgingCategory::PastDue2,
    ] {
        assert_eq!(summary.aging_amount(category), 0.0);
    }
    assert_eq!(
        summary.top_debtors,
        vec![DebtorExposure {
            name: "Acme".to_string(),
            amount: 600_000.0
        }]
    );
}

#[test]
fn test_boundary_days_through_parser() {
    let cases: [(u32, AgingCategory); 6] = [
        (30, AgingCategory::Current),
        (31, AgingCategory::PastDue1),
        (60, AgingCategory::PastDue1),
        (61, AgingCategory::PastDue2),
        (90, AgingCategory::PastDue2),
        (91, AgingCategory::BadDebt),
    ];
    let rows: Vec<String> = cases
        .iter()
        .enumerate()
        .map(|(i, (days, _))| {
            let date = reference()
                .checked_sub_days(Days::new(u64::from(*days)))
                .unwrap();
            format!("C{i},Name{i},INV-{i},{},,100,0,,Pending", date)
        })
        .collect();

    let records = parse_invoices(&csv_with_rows(&rows), &options()).unwrap();
    for (record, (days, expected)) in records.iter().zip(cases) {
        assert_eq!(record.overdue_days, days);
        assert_eq!(record.aging_bucket, expected, "{} days", days);
    }
}

#[test]
fn test_same_display_name_merges_across_ids() {
    let text = csv_with_rows(&[
        "C1,Acme,INV-1,2023-12-01,,1000,0,,Pending".to_string(),
        "C9,Acme,INV-2,2023-09-01,,500,100,,No Reply".to_string(),
        "C2,Beta,INV-3,2023-12-01,,1200,0,,Confirmed".to_string(),
    ]);
    let (_, summary) = audit_csv(&text, &options()).unwrap();

    assert_eq!(summary.top_debtors.len(), 2);
    assert_eq!(summary.top_debtors[0].name, "Acme");
    assert_eq!(summary.top_debtors[0].amount, 1400.0);
    assert_eq!(summary.top_debtors[1].name, "Beta");
}

#[test]
fn test_empty_aggregate() {
    let summary = calculate_audit_stats(&[]);
    assert_eq!(summary.net_exposure, 0.0);
    assert_eq!(summary.total_receivable, 0.0);
    assert!(summary.top_debtors.is_empty());
    assert!(AgingCategory::ALL
        .iter()
        .all(|c| summary.aging_amount(*c) == 0.0));
}

#[test]
fn test_degraded_rows_do_not_abort_batch() {
    let text = csv_with_rows(&[
        "C1,Acme,INV-1,not-a-date,,lots,0,,Pending".to_string(),
        "C2,Beta,INV-2,2023-12-01,,700,0,,Confirmed".to_string(),
    ]);
    let report = parse_invoices_with_report(&text, &options()).unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.degraded_rows(), 1);
    assert_eq!(report.records[0].overdue_days, 0);
    assert_eq!(report.records[0].billed_amount, 0.0);
    assert_eq!(report.records[1].billed_amount, 700.0);
}

#[test]
fn test_findings_and_context_from_parsed_upload() {
    let text = csv_with_rows(&[
        "C1,Acme,INV-1,2023-08-01,,1000,0,,No Reply".to_string(),
        "C2,Beta,INV-2,2023-12-01,,700,700,2023-12-20,Confirmed".to_string(),
    ]);
    let (records, summary) = audit_csv(&text, &options()).unwrap();

    let high_risk = filter_findings(&records, FindingsFilter::HighRisk);
    assert_eq!(high_risk.len(), 1);
    assert_eq!(high_risk[0].risk_level(), RiskLevel::High);
    assert_eq!(
        filter_findings(&records, FindingsFilter::NoReply)[0].invoice_number,
        "INV-1"
    );

    let context = format_context(&records, &summary);
    assert!(context.contains("Beta, Inv:INV-2, Date:2023-12-01, Due:, Amt:700, Paid:700, PaidDate:2023-12-20, Status:Confirmed"));
    assert_eq!(format_idr(summary.net_exposure), "Rp 1.000");
}

#[test]
fn test_session_keeps_dataset_on_rejected_upload() -> anyhow::Result<()> {
    let mut session = AuditSession::new(options());
    session.load_csv(&csv_with_rows(&[
        "C1,Acme,INV-1,2023-12-01,,1000,0,,Pending".to_string(),
    ]))?;

    assert!(session.load_csv("").is_err());
    assert_eq!(session.records().len(), 1);
    assert_eq!(
        session.summary().map(|s| s.net_exposure),
        Some(1000.0)
    );
    Ok(())
}

#[test]
fn test_summary_json_for_presentation_layer() -> anyhow::Result<()> {
    let text = csv_with_rows(&["C1,Acme,INV-1,2023-12-01,,1000,0,,Pending".to_string()]);
    let (_, summary) = audit_csv(&text, &options())?;
    let json: serde_json::Value = serde_json::to_value(&summary)?;

    assert_eq!(json["net_exposure"], 1000.0);
    assert_eq!(json["aging_profile"]["CURRENT"], 1000.0);
    assert_eq!(json["aging_profile"]["BAD_DEBT"], 0.0);
    assert_eq!(json["top_debtors"][0]["name"], "Acme");
    Ok(())
}
