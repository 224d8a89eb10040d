//! Encodes the document to bytes and keeps it under one fixed key.
//!
//! Reading never fails: missing, corrupt, unrecognised or too-new bytes all
//! come back as `None` and the caller starts from an empty document.
//! Writing serializes first and only touches the store when that succeeds.

use std::sync::Arc;

use handymenu_core::Document;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::kv::KeyValueStore;
use crate::migrations;

/// Document persistence over a [`KeyValueStore`].
#[derive(Clone)]
pub struct DataCaretaker {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for DataCaretaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCaretaker")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl DataCaretaker {
    /// Caretaker storing under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The fixed key documents are stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored document, migrating older layouts.
    pub fn retrieve(&self) -> Option<Document> {
        let bytes = match self.store.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %self.key, "no persisted document");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read persisted document");
                return None;
            }
        };
        let document = decode(&bytes);
        if document.is_none() {
            warn!(key = %self.key, bytes = bytes.len(), "discarding unreadable persisted document");
        }
        document
    }

    /// Serialize and write `document`. Nothing is written if encoding fails.
    pub fn save(&self, document: &Document) -> Result<()> {
        let bytes = encode(document)?;
        self.store.set(&self.key, &bytes)?;
        debug!(
            key = %self.key,
            bytes = bytes.len(),
            collections = document.collections.len(),
            "document saved"
        );
        Ok(())
    }
}

/// Document to its persisted byte form.
pub fn encode(document: &Document) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

/// Persisted bytes to a current-schema document, or `None` if unusable.
pub fn decode(bytes: &[u8]) -> Option<Document> {
    let raw: Value = match serde_json::from_slice(bytes) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "persisted bytes are not JSON");
            return None;
        }
    };
    let migrated = migrations::migrate(raw)?;
    match serde_json::from_value(migrated) {
        Ok(document) => Some(document),
        Err(e) => {
            debug!(error = %e, "persisted JSON does not match the document schema");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
