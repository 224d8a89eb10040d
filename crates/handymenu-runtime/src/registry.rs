//! Shortcut to collection lookup.
//!
//! Owners are identified by their position in the document, with the title
//! kept for reporting. The registry is rebuilt wholesale from the document
//! after every change, never patched incrementally by the controller, so
//! positions cannot drift out of sync.

use std::collections::HashMap;

use handymenu_core::{Document, MenuError, Result, Shortcut};
use tracing::{debug, warn};

/// Collection that owns a shortcut.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner {
    /// Position in the document.
    pub index: usize,
    /// Title at the time of registration.
    pub title: String,
}

/// A shortcut that lost to an earlier owner during [`ShortcutRegistry::rebuild`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedShortcut {
    /// Position of the collection that lost the shortcut.
    pub index: usize,
    /// The contested shortcut.
    pub shortcut: Shortcut,
    /// Position of the collection that kept it.
    pub kept_by: usize,
}

/// Exact-match shortcut lookup with global uniqueness.
#[derive(Clone, Debug, Default)]
pub struct ShortcutRegistry {
    by_shortcut: HashMap<Shortcut, Owner>,
    by_owner: HashMap<usize, Shortcut>,
}

impl ShortcutRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `shortcut` to the collection at `index`.
    ///
    /// Fails with [`MenuError::Conflict`] naming the current owner if another
    /// collection holds it. A collection has at most one shortcut, so any
    /// previous binding of `index` is released.
    pub fn register(&mut self, index: usize, title: &str, shortcut: Shortcut) -> Result<()> {
        if let Some(owner) = self.by_shortcut.get(&shortcut) {
            if owner.index != index {
                return Err(MenuError::Conflict {
                    shortcut,
                    owner: owner.index,
                    title: owner.title.clone(),
                });
            }
        }
        if let Some(previous) = self.by_owner.insert(index, shortcut) {
            if previous != shortcut {
                let _ = self.by_shortcut.remove(&previous);
            }
        }
        let _ = self.by_shortcut.insert(
            shortcut,
            Owner {
                index,
                title: title.to_owned(),
            },
        );
        Ok(())
    }

    /// Owner of `shortcut`, if any. Constant-time; safe on the input path.
    pub fn resolve(&self, shortcut: &Shortcut) -> Option<&Owner> {
        self.by_shortcut.get(shortcut)
    }

    /// Release whatever shortcut the collection at `index` holds.
    pub fn unregister(&mut self, index: usize) -> Option<Shortcut> {
        let shortcut = self.by_owner.remove(&index)?;
        let _ = self.by_shortcut.remove(&shortcut);
        Some(shortcut)
    }

    /// Shortcut currently bound to `index`.
    pub fn shortcut_of(&self, index: usize) -> Option<Shortcut> {
        self.by_owner.get(&index).copied()
    }

    /// Replace the contents with the bindings in `document`.
    ///
    /// Earlier collections win; every later duplicate is skipped and
    /// returned so the caller can clear it from the document.
    pub fn rebuild(&mut self, document: &Document) -> Vec<DroppedShortcut> {
        self.by_shortcut.clear();
        self.by_owner.clear();
        let mut dropped = Vec::new();

        for (index, collection) in document.collections.iter().enumerate() {
            let Some(shortcut) = collection.shortcut else {
                continue;
            };
            if let Err(MenuError::Conflict { owner, .. }) =
                self.register(index, &collection.title, shortcut)
            {
                warn!(
                    %shortcut,
                    index,
                    kept_by = owner,
                    "duplicate shortcut, later collection loses it"
                );
                dropped.push(DroppedShortcut {
                    index,
                    shortcut,
                    kept_by: owner,
                });
            }
        }

        debug!(bound = self.len(), "shortcut registry rebuilt");
        dropped
    }

    /// Number of bound shortcuts.
    pub fn len(&self) -> usize {
        self.by_shortcut.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.by_shortcut.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
