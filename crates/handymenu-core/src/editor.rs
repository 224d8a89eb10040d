//! Working copy behind the settings window.
//!
//! A [`CollectionEditor`] owns a clone of the collections plus the index of
//! the collection being edited. Edits stay local until the caller commits
//! the result through the controller, which validates and persists it.

use tracing::debug;

use crate::errors::{MenuError, Result};
use crate::model::{Collection, CollectionItem, CommandRef, Document};
use crate::ops::adjusted_drop_index;
use crate::shortcut::Shortcut;

/// Editable copy of a document's collections with an active selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionEditor {
    document: Document,
    active: usize,
}

impl CollectionEditor {
    /// Start a session over a copy of `document`, selecting the first collection.
    pub fn new(document: &Document) -> Self {
        let mut document = document.clone();
        let _ = document.normalize();
        Self {
            document,
            active: 0,
        }
    }

    /// All collections in the working copy.
    pub fn collections(&self) -> &[Collection] {
        &self.document.collections
    }

    /// Index of the collection being edited.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The collection being edited.
    pub fn active(&self) -> &Collection {
        &self.document.collections[self.active]
    }

    /// Consume the session, yielding the edited collections.
    pub fn into_collections(self) -> Vec<Collection> {
        self.document.collections
    }

    /// Change the active collection.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.document.collections.len();
        if index >= len {
            return Err(MenuError::IndexOutOfRange { index, len });
        }
        self.active = index;
        Ok(())
    }

    /// Append a fresh collection and make it active.
    pub fn add_collection(&mut self) -> usize {
        self.active = self.document.add_collection();
        debug!(index = self.active, title = %self.active().title, "collection added");
        self.active
    }

    /// Remove the collection at `index`, keeping the active selection coherent.
    pub fn remove_collection(&mut self, index: usize) -> Result<()> {
        let fallback = self.document.remove_collection(index)?;
        if index == self.active {
            self.active = fallback;
        } else if index < self.active {
            self.active -= 1;
        }
        Ok(())
    }

    /// Rename the active collection. Returns the stored title.
    pub fn rename_active(&mut self, title: &str) -> Result<String> {
        self.document.rename_collection(self.active, title)
    }

    /// Bind or clear the shortcut of the collection at `index`.
    ///
    /// Binding a shortcut another collection owns fails with
    /// [`MenuError::Conflict`] and changes nothing.
    pub fn set_shortcut(&mut self, index: usize, shortcut: Option<Shortcut>) -> Result<()> {
        let len = self.document.collections.len();
        if index >= len {
            return Err(MenuError::IndexOutOfRange { index, len });
        }
        if let Some(wanted) = shortcut {
            let owner = self
                .document
                .collections
                .iter()
                .enumerate()
                .find(|(i, c)| *i != index && c.shortcut == Some(wanted));
            if let Some((owner, collection)) = owner {
                return Err(MenuError::Conflict {
                    shortcut: wanted,
                    owner,
                    title: collection.title.clone(),
                });
            }
        }
        self.document.collections[index].shortcut = shortcut;
        Ok(())
    }

    /// Toggle auto-grouping on the active collection.
    pub fn set_auto_grouping(&mut self, on: bool) {
        self.active_mut().set_auto_grouping(on);
    }

    /// Insert a catalog command into the active collection at `row`.
    ///
    /// A command already present in the collection is rejected.
    pub fn insert_command(&mut self, command: CommandRef, row: usize) -> Result<()> {
        if self.is_used(&command) {
            return Err(MenuError::invalid(format!(
                "command {} is already in collection {}",
                command.command_name,
                self.active().title
            )));
        }
        self.active_mut().insert_item(command.into(), row)
    }

    /// Append a catalog command to the active collection.
    pub fn append_command(&mut self, command: CommandRef) -> Result<()> {
        let end = self.active().items.len();
        self.insert_command(command, end)
    }

    /// Append a separator to the active collection.
    pub fn append_separator(&mut self) -> Result<()> {
        let active = self.active_mut();
        let end = active.items.len();
        active.insert_item(CollectionItem::Separator, end)
    }

    /// Move an item of the active collection to a list drop row.
    ///
    /// `row` is in list coordinates and may equal the item count.
    pub fn move_item(&mut self, from: usize, row: usize) -> Result<()> {
        let len = self.active().items.len();
        if row > len {
            return Err(MenuError::IndexOutOfRange { index: row, len });
        }
        self.active_mut().move_item(from, adjusted_drop_index(from, row))
    }

    /// Remove an item of the active collection.
    pub fn remove_item(&mut self, index: usize) -> Result<CollectionItem> {
        self.active_mut().remove_item(index)
    }

    /// Whether `command` is already in the active collection.
    pub fn is_used(&self, command: &CommandRef) -> bool {
        self.active().contains_command(command)
    }

    fn active_mut(&mut self) -> &mut Collection {
        &mut self.document.collections[self.active]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
