//! Persisted entity graph: documents, collections and their items.
//!
//! All types serialize with camelCase field names. Unknown fields are ignored
//! on read and absent optional fields take their defaults (`shortcut: null`,
//! `autoGrouping: false`, `items: []`), so older and newer writers can share
//! a store.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::shortcut::Shortcut;

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Title given to the collection that stands in for an empty document.
pub const EMPTY_COLLECTION_TITLE: &str = "New Collection 1";

/// Durable reference to a host command.
///
/// Not a live handle: validity is re-checked against the catalog on every
/// load. Two references are equal iff their `(pluginID, commandID)` pair
/// matches; the display names are carried along but never compared.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRef {
    /// Identifier of the plugin that owns the command.
    #[serde(rename = "pluginID")]
    pub plugin_id: String,
    /// Identifier of the command inside its plugin.
    #[serde(rename = "commandID")]
    pub command_id: String,
    /// Display name of the command.
    pub command_name: String,
    /// Display name of the owning plugin.
    pub plugin_name: String,
}

impl CommandRef {
    /// Build a reference from its four parts.
    pub fn new(
        plugin_id: impl Into<String>,
        command_id: impl Into<String>,
        command_name: impl Into<String>,
        plugin_name: impl Into<String>,
    ) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            command_id: command_id.into(),
            command_name: command_name.into(),
            plugin_name: plugin_name.into(),
        }
    }

    /// Whether this reference points at `(plugin_id, command_id)`.
    pub fn matches(&self, plugin_id: &str, command_id: &str) -> bool {
        self.plugin_id == plugin_id && self.command_id == command_id
    }
}

impl PartialEq for CommandRef {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.plugin_id, &other.command_id)
    }
}

impl Eq for CommandRef {}

impl Hash for CommandRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plugin_id.hash(state);
        self.command_id.hash(state);
    }
}

/// One menu entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CollectionItem {
    /// A host command.
    Command(CommandRef),
    /// A visual divider. Carries no payload and is never catalog-validated.
    Separator,
}

impl CollectionItem {
    /// Whether this item is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    /// The command reference, if this item is a command.
    pub fn as_command(&self) -> Option<&CommandRef> {
        match self {
            Self::Command(command) => Some(command),
            Self::Separator => None,
        }
    }
}

impl From<CommandRef> for CollectionItem {
    fn from(command: CommandRef) -> Self {
        Self::Command(command)
    }
}

/// A named, ordered bag of menu entries bound to an optional shortcut.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Display title. Unique among siblings at the editing boundary only.
    pub title: String,
    /// Optional key chord that opens this collection as a menu.
    #[serde(default)]
    pub shortcut: Option<Shortcut>,
    /// When set, separators are disallowed and stripped.
    #[serde(default)]
    pub auto_grouping: bool,
    /// Entries in display order.
    #[serde(default)]
    pub items: Vec<CollectionItem>,
}

impl Collection {
    /// An empty collection with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            shortcut: None,
            auto_grouping: false,
            items: Vec::new(),
        }
    }

    /// The collection that stands in for an empty document.
    pub fn empty_default() -> Self {
        Self::new(EMPTY_COLLECTION_TITLE)
    }

    /// Builder-style shortcut assignment.
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Builder-style item list.
    #[must_use]
    pub fn with_items(mut self, items: Vec<CollectionItem>) -> Self {
        self.items = items;
        self
    }

    /// Whether a command with the same `(pluginID, commandID)` is already present.
    pub fn contains_command(&self, command: &CommandRef) -> bool {
        self.items
            .iter()
            .any(|item| item.as_command() == Some(command))
    }
}

/// Root persisted aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Schema version the document was written with.
    pub schema_version: u32,
    /// Collections in display and shortcut-priority order.
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Document {
    /// An empty document at the current schema version.
    pub fn empty() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            collections: Vec::new(),
        }
    }

    /// A current-version document holding `collections`.
    pub fn with_collections(collections: Vec<Collection>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            collections,
        }
    }

    /// Replace an empty collection list with one empty default collection.
    ///
    /// Returns `true` if the document was changed.
    pub fn normalize(&mut self) -> bool {
        if self.collections.is_empty() {
            self.collections.push(Collection::empty_default());
            true
        } else {
            false
        }
    }

    /// Titles in order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.title.as_str())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
