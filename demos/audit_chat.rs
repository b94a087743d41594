use dotenv::dotenv;
use receivables_audit::llm::{AuditAssistant, GeminiClient};
use receivables_audit::{AuditSession, ChatTurn, ParseOptions};
use std::error::Error;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/sample_receivables.csv".to_string());
    let text = std::fs::read_to_string(&path)?;

    let options = ParseOptions::default();
    let reference_date = options.reference_date;
    let mut session = AuditSession::new(options);
    let outcome = session.load_csv(&text)?;
    println!("✅ Loaded {} invoices.\n", outcome.rows);

    let summary = session.summary().ok_or("no summary after a successful upload")?;
    let assistant = AuditAssistant::new(GeminiClient::from_env()?)
        .with_reference_date(reference_date)
        .with_max_context_rows(200);

    println!("🤖 AuditGuard ready. Ask about the receivables ('report' drafts a report, 'quit' exits).");
    println!("------------------------------------------------------------------");

    let mut history: Vec<ChatTurn> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit") || prompt.eq_ignore_ascii_case("exit") {
            break;
        }
        if prompt.is_empty() {
            continue;
        }

        let answer = if prompt.eq_ignore_ascii_case("report") {
            assistant.generate_report(session.records(), summary).await
        } else {
            assistant
                .analyze_query(prompt, session.records(), summary, &history)
                .await
        };

        match answer {
            Ok(text) => {
                println!("\n{}\n", text);
                history.push(ChatTurn::user(prompt));
                history.push(ChatTurn::model(text));
            }
            Err(e) => eprintln!("❌ Error: {}", e),
        }
    }

    Ok(())
}
