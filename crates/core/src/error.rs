//! Error types for the Breedbox domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each seam gets its own enum: warehouse access raises [`DataError`],
//! chat backends raise [`ChatError`].

use thiserror::Error;

/// Failures raised by a query executor or the storage behind it.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    /// The storage could not be opened or reached.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A query was rejected or failed mid-execution.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema setup failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Failures raised by a chat backend.
///
/// The variants are deliberately coarse. Callers branch on them to pick a
/// recovery path: heuristic fallback, a single retry, or a plain explanation.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Credentials are missing or were rejected.
    #[error("Chat backend not configured: {0}")]
    NotConfigured(String),

    /// The account ran out of quota or was rate limited.
    #[error("Chat quota exceeded")]
    QuotaExceeded,

    /// A call failed for a reason that may not recur.
    #[error("Chat call failed: {0}")]
    Transient(String),

    /// No usable chat backend exists in this process.
    #[error("Chat backend unavailable: {0}")]
    Unavailable(String),
}
