use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import rejected: {0}")]
    Import(String),

    #[error("Unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("Ambiguous transaction id '{0}' matches {1} records")]
    AmbiguousId(String, usize),

    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
