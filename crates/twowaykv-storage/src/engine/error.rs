//! Storage error types.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened.
    #[error("failed to open database: {0}")]
    Open(String),

    /// A transaction error occurred.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A write was attempted on a read-only transaction.
    #[error("write attempted on a read-only transaction")]
    ReadOnly,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal backend error occurred.
    #[error("internal storage error: {0}")]
    Internal(String),
}

/// Convenience alias for storage results.
pub type StorageResult<T> = Result<T, StorageError>;
