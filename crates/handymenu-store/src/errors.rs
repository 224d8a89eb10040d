//! Error types for the persistence layer.
//!
//! [`StoreError`] is returned by every backend and by the caretaker's save
//! path. Callers above the store see it as
//! [`MenuError::PersistenceFailure`](handymenu_core::MenuError::PersistenceFailure).

use handymenu_core::MenuError;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted bytes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Filesystem error (creating the database directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure without a richer source.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for MenuError {
    fn from(err: StoreError) -> Self {
        MenuError::PersistenceFailure(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
