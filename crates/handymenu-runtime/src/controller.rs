//! The single mutation gateway for the menu document.
//!
//! Lifecycle: `Uninitialized → Loaded → Ready`. [`DataController::load`]
//! retrieves, stamps, reconciles and deduplicates the persisted document,
//! rebuilds the shortcut registry and publishes. After that, every edit goes
//! through [`DataController::save_collections`], which validates shortcut
//! uniqueness, replaces the document, persists it and republishes on success.
//!
//! A failed write does not roll the in-memory document back. The edit stays
//! authoritative until the next successful save or process restart.

use std::sync::Arc;

use handymenu_core::{
    CURRENT_SCHEMA_VERSION, Collection, CollectionEditor, CommandCatalog, Document,
    InstalledPlugin, MenuError, Result, Shortcut, reconcile,
};
use handymenu_settings::MenuSettings;
use handymenu_store::{DataCaretaker, KeyValueStore, MemoryStore, SqliteConfig, SqliteStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::dispatch::{KeyDisposition, MenuPresenter};
use crate::emitter::{CatalogUpdates, DocumentUpdates, EventEmitter};
use crate::events::MenuEvent;
use crate::registry::ShortcutRegistry;

/// Where the controller is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed; nothing read yet.
    Uninitialized,
    /// Persisted document read, not yet published.
    Loaded,
    /// Document published; edits and dispatch are accepted.
    Ready,
}

/// What to do when an assigned shortcut is owned by another collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Surface [`MenuError::Conflict`] and change nothing.
    #[default]
    Reject,
    /// Take the shortcut away from its current owner.
    Reassign,
}

/// Owns the document, the shortcut registry and the event channel.
pub struct DataController {
    caretaker: DataCaretaker,
    catalog: Arc<dyn CommandCatalog>,
    registry: ShortcutRegistry,
    emitter: EventEmitter,
    state: ControllerState,
    document: Arc<Document>,
    installed: Arc<Vec<InstalledPlugin>>,
}

impl std::fmt::Debug for DataController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataController")
            .field("state", &self.state)
            .field("collections", &self.document.collections.len())
            .field("shortcuts", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl DataController {
    /// Wire a controller from its collaborators.
    pub fn new(
        caretaker: DataCaretaker,
        catalog: Arc<dyn CommandCatalog>,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            caretaker,
            catalog,
            registry: ShortcutRegistry::new(),
            emitter,
            state: ControllerState::Uninitialized,
            document: Arc::new(Document::empty()),
            installed: Arc::new(Vec::new()),
        }
    }

    /// Build the store, caretaker and emitter described by `settings`.
    ///
    /// Uses a [`SqliteStore`] when `storage.databasePath` is set, otherwise
    /// an in-memory store.
    pub fn from_settings(
        settings: &MenuSettings,
        catalog: Arc<dyn CommandCatalog>,
    ) -> handymenu_store::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &settings.storage.database_path {
            Some(path) => Arc::new(SqliteStore::open(path, &SqliteConfig::default())?),
            None => {
                debug!("no database path configured, keeping document in memory");
                Arc::new(MemoryStore::new())
            }
        };
        let caretaker = DataCaretaker::new(store, settings.storage.store_key());
        let emitter = EventEmitter::with_capacity(settings.events.channel_capacity);
        Ok(Self::new(caretaker, catalog, emitter))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Subscribe to document and catalog notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<MenuEvent> {
        self.emitter.subscribe()
    }

    /// Subscribe to published documents only.
    pub fn subscribe_documents(&self) -> DocumentUpdates {
        self.emitter.subscribe_documents()
    }

    /// Subscribe to catalog snapshots and failures only.
    pub fn subscribe_catalog(&self) -> CatalogUpdates {
        self.emitter.subscribe_catalog()
    }

    /// Read, reconcile and publish the persisted document.
    ///
    /// Never fails: absent or unreadable bytes start an empty document, and
    /// an unreadable catalog is reported as [`MenuEvent::CatalogUnavailable`].
    /// Calling it again re-reads the store.
    pub fn load(&mut self) -> Arc<Document> {
        let mut document = self.caretaker.retrieve().unwrap_or_else(|| {
            info!("starting with an empty document");
            Document::empty()
        });
        document.schema_version = CURRENT_SCHEMA_VERSION;
        self.state = ControllerState::Loaded;

        let mut document = reconcile(&document, self.catalog.as_ref());
        for dropped in self.registry.rebuild(&document) {
            document.collections[dropped.index].shortcut = None;
        }
        if document.normalize() {
            debug!("empty document normalized to one collection");
        }

        self.document = Arc::new(document);
        self.state = ControllerState::Ready;
        info!(
            collections = self.document.collections.len(),
            shortcuts = self.registry.len(),
            "document loaded"
        );
        let _ = self
            .emitter
            .emit(MenuEvent::document_changed(Arc::clone(&self.document)));

        self.refresh_catalog();
        Arc::clone(&self.document)
    }

    /// Replace the document's collections and persist.
    ///
    /// Rejects duplicate shortcuts with [`MenuError::Conflict`] before
    /// changing anything. A write failure returns
    /// [`MenuError::PersistenceFailure`] but keeps the new collections in
    /// memory and publishes nothing.
    pub fn save_collections(&mut self, collections: Vec<Collection>) -> Result<()> {
        self.ensure_ready()?;

        let mut document = Document::with_collections(collections);
        let _ = document.normalize();
        let mut registry = ShortcutRegistry::new();
        for (index, collection) in document.collections.iter().enumerate() {
            if let Some(shortcut) = collection.shortcut {
                registry.register(index, &collection.title, shortcut)?;
            }
        }

        self.document = Arc::new(document);
        self.registry = registry;

        if let Err(e) = self.caretaker.save(&self.document) {
            warn!(error = %e, "document not persisted, edits may be lost on restart");
            return Err(e.into());
        }
        debug!(collections = self.document.collections.len(), "collections saved");
        let _ = self
            .emitter
            .emit(MenuEvent::document_changed(Arc::clone(&self.document)));
        Ok(())
    }

    /// Start an editing session over the current collections.
    pub fn editor(&self) -> Result<CollectionEditor> {
        self.ensure_ready()?;
        Ok(CollectionEditor::new(&self.document))
    }

    /// Save the result of an editing session.
    pub fn commit(&mut self, editor: CollectionEditor) -> Result<()> {
        self.save_collections(editor.into_collections())
    }

    /// Bind or clear the shortcut of the collection at `index`, then save.
    pub fn assign_shortcut(
        &mut self,
        index: usize,
        shortcut: Option<Shortcut>,
        policy: ConflictPolicy,
    ) -> Result<()> {
        self.ensure_ready()?;
        let len = self.document.collections.len();
        if index >= len {
            return Err(MenuError::IndexOutOfRange { index, len });
        }

        let mut collections = self.document.collections.clone();
        if let Some(wanted) = shortcut {
            let mut scratch = self.registry.clone();
            let _ = scratch.unregister(index);
            if let Err(err) = scratch.register(index, &collections[index].title, wanted) {
                let MenuError::Conflict { owner, .. } = err else {
                    return Err(err);
                };
                match policy {
                    ConflictPolicy::Reject => return Err(err),
                    ConflictPolicy::Reassign => {
                        info!(%wanted, from = owner, to = index, "reassigning shortcut");
                        collections[owner].shortcut = None;
                    }
                }
            }
        }
        collections[index].shortcut = shortcut;
        self.save_collections(collections)
    }

    /// Collection bound to `shortcut`, if any. Does not mutate state.
    pub fn dispatch(&self, shortcut: Shortcut) -> Result<Option<&Collection>> {
        self.ensure_ready()?;
        Ok(self
            .registry
            .resolve(&shortcut)
            .and_then(|owner| self.document.collections.get(owner.index)))
    }

    /// Key-event entry point: show the matching menu or let the event pass.
    ///
    /// Before the controller is ready every event passes through.
    pub fn handle_shortcut(
        &self,
        shortcut: Shortcut,
        presenter: &dyn MenuPresenter,
    ) -> KeyDisposition {
        match self.dispatch(shortcut) {
            Ok(Some(collection)) => {
                debug!(%shortcut, title = %collection.title, "shortcut resolved");
                presenter.on_shortcut_resolved(collection);
                KeyDisposition::Consumed
            }
            Ok(None) => KeyDisposition::PassThrough,
            Err(e) => {
                debug!(%shortcut, error = %e, "shortcut ignored");
                KeyDisposition::PassThrough
            }
        }
    }

    /// Re-read the catalog and republish it.
    pub fn reload_catalog(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.refresh_catalog();
        Ok(())
    }

    /// The published document.
    pub fn document(&self) -> Result<Arc<Document>> {
        self.ensure_ready()?;
        Ok(Arc::clone(&self.document))
    }

    /// Last successfully read catalog snapshot.
    pub fn installed_plugins(&self) -> Arc<Vec<InstalledPlugin>> {
        Arc::clone(&self.installed)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.state == ControllerState::Ready {
            Ok(())
        } else {
            Err(MenuError::NotInitialized)
        }
    }

    fn refresh_catalog(&mut self) {
        match self.catalog.list_installed() {
            Ok(plugins) => {
                debug!(plugins = plugins.len(), "catalog loaded");
                self.installed = Arc::new(plugins);
                let _ = self.emitter.emit(MenuEvent::CatalogLoaded {
                    plugins: Arc::clone(&self.installed),
                });
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable, keeping previous snapshot");
                let _ = self.emitter.emit(MenuEvent::CatalogUnavailable {
                    reason: e.to_string(),
                });
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
