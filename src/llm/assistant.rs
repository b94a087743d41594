use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use log::{debug, error};

use crate::error::Result;
use crate::llm::client::GeminiClient;
use crate::llm::types::Part;
use crate::narrative::{
    build_query_prompt, build_report_prompt, format_context_with_limit, system_prompt, ChatTurn,
    AUDIO_CONTEXT_INTRO, AUDIO_QUESTION_INTRO,
};
use crate::schema::{default_reference_date, AuditSummary, InvoiceRecord};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// MediaRecorder's default container in browsers.
pub const DEFAULT_AUDIO_MIME: &str = "audio/webm;codecs=opus";

const EMPTY_ANSWER: &str = "Maaf, saya tidak dapat menganalisis data saat ini.";
const EMPTY_AUDIO_ANSWER: &str = "Maaf, suara tidak terdengar jelas.";
const EMPTY_REPORT: &str = "Gagal membuat laporan.";

/// Chat, voice and report drafting over a parsed receivables population.
pub struct AuditAssistant {
    client: GeminiClient,
    model: String,
    reference_date: NaiveDate,
    max_context_rows: Option<usize>,
}

impl AuditAssistant {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            reference_date: default_reference_date(),
            max_context_rows: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Should match the date the records were aged against.
    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    /// Caps how many raw rows are sent with each request.
    pub fn with_max_context_rows(mut self, max_rows: usize) -> Self {
        self.max_context_rows = Some(max_rows);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn context(&self, records: &[InvoiceRecord], summary: &AuditSummary) -> String {
        format_context_with_limit(records, summary, self.max_context_rows)
    }

    async fn send(&self, parts: Vec<Part>, fallback: &str) -> Result<String> {
        let text = self
            .client
            .generate(&self.model, parts)
            .await
            .map_err(|e| {
                error!("Gemini request to {} failed: {}", self.model, e);
                e
            })?;

        if text.trim().is_empty() {
            debug!("Gemini returned no text, using fallback answer");
            return Ok(fallback.to_string());
        }
        Ok(text)
    }

    pub async fn analyze_query(
        &self,
        query: &str,
        records: &[InvoiceRecord],
        summary: &AuditSummary,
        history: &[ChatTurn],
    ) -> Result<String> {
        let context = self.context(records, summary);
        let prompt = build_query_prompt(query, &context, history, self.reference_date);
        self.send(vec![Part::text(prompt)], EMPTY_ANSWER).await
    }

    /// `audio` is the raw recording; it is base64-encoded for the request.
    pub async fn analyze_audio_query(
        &self,
        audio: &[u8],
        mime_type: &str,
        records: &[InvoiceRecord],
        summary: &AuditSummary,
    ) -> Result<String> {
        let context = self.context(records, summary);
        let parts = vec![
            Part::text(system_prompt(self.reference_date)),
            Part::text(AUDIO_CONTEXT_INTRO),
            Part::text(context),
            Part::text(AUDIO_QUESTION_INTRO),
            Part::inline_data(mime_type, STANDARD.encode(audio)),
        ];
        self.send(parts, EMPTY_AUDIO_ANSWER).await
    }

    /// Drafts an internal audit report in Markdown.
    pub async fn generate_report(
        &self,
        records: &[InvoiceRecord],
        summary: &AuditSummary,
    ) -> Result<String> {
        let context = self.context(records, summary);
        let prompt = build_report_prompt(&context, self.reference_date);
        self.send(vec![Part::text(prompt)], EMPTY_REPORT).await
    }
}
