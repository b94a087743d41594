use chrono::NaiveDate;
use receivables_audit::{
    filter_findings, format_idr, AgingCategory, AuditSession, FindingsFilter, ParseOptions,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/sample_receivables.csv".to_string());
    let text = std::fs::read_to_string(&path)?;

    let reference_date = NaiveDate::from_ymd_opt(2023, 12, 31).ok_or("invalid reference date")?;
    let mut session = AuditSession::new(ParseOptions::new(reference_date));
    let outcome = session.load_csv(&text)?;

    println!("📂 Loaded {} invoices from {}", outcome.rows, path);
    if outcome.degraded_rows > 0 {
        println!("⚠️  {} rows had unreadable cells:", outcome.degraded_rows);
        for diagnostic in &outcome.diagnostics {
            println!("   line {}: {:?}", diagnostic.line, diagnostic.issue);
        }
    }

    let summary = session.summary().ok_or("no summary after a successful upload")?;

    println!("\n📊 Receivables Summary (as of {})", reference_date);
    println!("------------------------------------------------------------");
    println!("Total Receivable   : {}", format_idr(summary.total_receivable));
    println!("Total Collections  : {}", format_idr(summary.total_collections));
    println!("Net Exposure       : {}", format_idr(summary.net_exposure));
    println!("Bad Debt (>90 days): {}", format_idr(summary.bad_debt_potential));

    println!("\nAging Profile:");
    for category in AgingCategory::ALL {
        println!(
            "  {:<28} {}",
            category.label(),
            format_idr(summary.aging_amount(category))
        );
    }

    println!("\nTop Debtors:");
    for (rank, debtor) in summary.top_debtors.iter().enumerate() {
        println!("  {}. {:<24} {}", rank + 1, debtor.name, format_idr(debtor.amount));
    }
    println!(
        "  Concentration: {}",
        format_idr(summary.top_debtor_concentration())
    );

    println!("\n🚩 High Risk Invoices (>90 days):");
    for record in filter_findings(session.records(), FindingsFilter::HighRisk) {
        println!(
            "  {} {} {} days, status: {}",
            record.invoice_number, record.customer_name, record.overdue_days, record.confirmation_status
        );
    }

    println!("\nJSON for the dashboard:");
    println!("{}", summary.to_json()?);

    Ok(())
}
