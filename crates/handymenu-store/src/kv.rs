//! The opaque key-value byte store the document lives in.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::errors::Result;

/// Get/set byte store keyed by string.
///
/// Writes are last-write-wins. Implementations need no transactional or
/// merge semantics.
pub trait KeyValueStore: Send + Sync {
    /// Bytes stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Process-local store, for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        let _ = store.entries.lock().insert(key.into(), value.into());
        store
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let _ = self.entries.lock().insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
