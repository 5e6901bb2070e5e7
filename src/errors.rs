use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed state: {0}")]
    MalformedState(String),
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}
