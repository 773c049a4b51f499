use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("line {line}: {message}")]
    Row { line: u64, message: String },

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, IngestError>;
