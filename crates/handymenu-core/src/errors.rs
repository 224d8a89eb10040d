//! Error taxonomy shared by the model, the shortcut registry and the controller.
//!
//! No variant is fatal to the process. The worst outcome is
//! [`MenuError::PersistenceFailure`]: edits stay authoritative in memory but
//! may be lost on restart.

use thiserror::Error;

use crate::shortcut::Shortcut;

/// Errors raised by collection editing, shortcut binding and orchestration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MenuError {
    /// An operation ran before the controller finished loading.
    #[error("not initialized: load has not completed")]
    NotInitialized,

    /// A position was outside the current bounds.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The rejected position.
        index: usize,
        /// Length of the sequence at the time of the call.
        len: usize,
    },

    /// A semantically disallowed edit.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The shortcut is already owned by another collection.
    #[error("shortcut {shortcut} is already bound to collection {owner} ({title})")]
    Conflict {
        /// The contested shortcut.
        shortcut: Shortcut,
        /// Position of the collection that currently owns it.
        owner: usize,
        /// Title of the owning collection.
        title: String,
    },

    /// Serializing or writing the document failed.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl MenuError {
    /// Shorthand for [`MenuError::InvalidOperation`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Whether the caller can recover by re-validating and retrying.
    ///
    /// `NotInitialized` is a sequencing bug in the host, everything else is
    /// an expected runtime condition.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotInitialized)
    }

    /// Short classification string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::Conflict { .. } => "conflict",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }
}

/// Result type for model and controller operations.
pub type Result<T> = std::result::Result<T, MenuError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
