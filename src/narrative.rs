//! Text handed to the generative-AI collaborator: the data context rendered
//! from records and summary, plus the chat, audio and report prompts built on it.

use crate::schema::{AgingCategory, AuditSummary, InvoiceRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const ASSISTANT_NAME: &str = "AuditGuard";

pub const AUDIT_SYSTEM_PROMPT: &str = r#"
Role: Anda adalah AI Senior Auditor dan Data Analyst bernama "AuditGuard".
Tugas: Melakukan audit substantif piutang usaha (Accounts Receivable).

Capabilities:
1. Data Ingestion: Membaca data CSV transaksi piutang.
2. Risk Assessment: Mendeteksi pola fraud seperti 'Lapping' (pembayaran bulat yang terus tertunda) atau saldo macet >120 hari.
3. Voice/Chat Interaction: Jawab dengan gaya percakapan lisan yang ringkas, profesional, namun "humanis" (seperti konsultan berbicara pada klien). JANGAN membacakan tabel angka panjang. Berikan rangkuman eksekutif.
4. Reporting: Menyusun laporan audit formal sesuai standar SPAP/ISA.

Rules:
- Fokus pada asersi: Eksistensi, Kelengkapan, dan Penilaian (Valuation).
- Jika menemukan saldo > 90 hari, sarankan pembentukan Cadangan Kerugian Penurunan Nilai (CKPN).
"#;

pub const AUDIO_CONTEXT_INTRO: &str = "Berikut adalah data audit untuk konteks jawaban Anda:";

pub const AUDIO_QUESTION_INTRO: &str = "User bertanya melalui audio berikut. Jawablah secara lisan (teks yang merepresentasikan jawaban lisan).";

const REPORT_REQUEST: &str = r#"REQUEST:
Berdasarkan seluruh analisis sesi ini, buatkan Draf Laporan Audit Internal dalam format MARKDOWN yang terstruktur.

Struktur Laporan:
1. Opini Ringkas (Wajar/Tidak Wajar)
2. Ringkasan Saldo & Aging (Sajikan angka kunci)
3. Temuan Utama (Key Audit Matters): Fokus pada indikasi Lapping, Konfirmasi yang 'No Reply', dan Saldo Macet.
4. Evaluasi CKPN: Analisis kecukupan cadangan.
5. Rekomendasi Pengendalian Internal.

Gunakan format Markdown profesional."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

fn date_or_blank(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One line per invoice, in the shape the model is told to expect.
pub fn format_record_line(record: &InvoiceRecord) -> String {
    format!(
        "{}, Inv:{}, Date:{}, Due:{}, Amt:{}, Paid:{}, PaidDate:{}, Status:{}",
        record.customer_name,
        record.invoice_number,
        date_or_blank(record.invoice_date),
        date_or_blank(record.due_date),
        record.billed_amount,
        record.amount_received,
        date_or_blank(record.payment_date),
        record.confirmation_status
    )
}

pub fn format_context(records: &[InvoiceRecord], summary: &AuditSummary) -> String {
    format_context_with_limit(records, summary, None)
}

/// Renders summary totals followed by the raw rows. With `max_rows`, only the
/// first rows are included and the omitted count is stated.
pub fn format_context_with_limit(
    records: &[InvoiceRecord],
    summary: &AuditSummary,
    max_rows: Option<usize>,
) -> String {
    let mut out = String::new();

    out.push_str("CONTEXT DATA (AUDIT SUMMARY):\n");
    out.push_str(&format!("Total Receivable: {}\n", summary.total_receivable));
    out.push_str(&format!("Total Collections: {}\n", summary.total_collections));
    out.push_str(&format!("Net Exposure: {}\n", summary.net_exposure));
    out.push_str(&format!(
        "Bad Debt (>90 days): {}\n",
        summary.bad_debt_potential
    ));

    out.push_str("Aging Profile:\n");
    for category in AgingCategory::ALL {
        out.push_str(&format!(
            "- {}: {}\n",
            category.label(),
            summary.aging_amount(category)
        ));
    }

    if !summary.top_debtors.is_empty() {
        out.push_str("Top Debtors:\n");
        for (rank, debtor) in summary.top_debtors.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}: {}\n",
                rank + 1,
                debtor.name,
                debtor.amount
            ));
        }
    }

    out.push_str("\nRAW DATA SAMPLE (CSV format):\n");
    out.push_str("Customer, Invoice, Date, DueDate, Amount, Paid, PaidDate, ConfirmStatus\n");

    let shown = max_rows.unwrap_or(records.len()).min(records.len());
    for record in &records[..shown] {
        out.push_str(&format_record_line(record));
        out.push('\n');
    }
    if shown < records.len() {
        out.push_str(&format!(
            "... {} more rows omitted\n",
            records.len() - shown
        ));
    }

    out
}

pub fn format_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                ChatRole::User => "User",
                ChatRole::Model => ASSISTANT_NAME,
            };
            format!("{}: {}", speaker, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn reference_date_rule(reference_date: NaiveDate) -> String {
    format!(
        "- Asumsikan Tanggal Neraca adalah {}.\n",
        reference_date.format("%Y-%m-%d")
    )
}

/// The persona prompt with the balance sheet date the population was aged against.
pub fn system_prompt(reference_date: NaiveDate) -> String {
    format!(
        "{}{}",
        AUDIT_SYSTEM_PROMPT,
        reference_date_rule(reference_date)
    )
}

pub fn build_query_prompt(
    query: &str,
    context: &str,
    history: &[ChatTurn],
    reference_date: NaiveDate,
) -> String {
    format!(
        "{}\n{}\nConversation History:\n{}\n\nUser Question: {}\n\nAnswer (Professional, concise, Indonesian):\n",
        system_prompt(reference_date),
        context,
        format_history(history),
        query
    )
}

pub fn build_report_prompt(context: &str, reference_date: NaiveDate) -> String {
    format!(
        "{}\nDATA:\n{}\n{}\n",
        system_prompt(reference_date),
        context,
        REPORT_REQUEST
    )
}
