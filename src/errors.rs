use thiserror::Error;

/// Error type that captures every failure the ledger core can raise.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("invalid month: {0}")]
    InvalidMonth(String),
    #[error("overpayment: {0}")]
    Overpayment(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
