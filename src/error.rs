use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Input is empty: expected a header line followed by invoice rows")]
    EmptyInput,

    #[error("Header '{0}' contains no data rows")]
    NoDataRows(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
