//! Fan-out of [`MenuEvent`]s to the settings window and the menu renderer.
//!
//! Consumers usually care about one kind of notification. The menu renderer
//! only re-renders on document changes, the command picker only on catalog
//! changes, so besides the raw [`broadcast::Receiver`] the emitter hands out
//! [`DocumentUpdates`] and [`CatalogUpdates`], which filter by kind.
//!
//! Both typed receivers treat a lag as harmless: every document or catalog
//! notification carries the full snapshot, so skipping older ones loses
//! nothing the next one does not replace.

use std::sync::Arc;

use handymenu_core::{Document, InstalledPlugin};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::events::MenuEvent;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// Publishes menu notifications. `emit` never blocks.
#[derive(Debug)]
pub struct EventEmitter {
    tx: broadcast::Sender<MenuEvent>,
}

impl EventEmitter {
    /// Emitter with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Emitter with room for `capacity` pending events per receiver.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish `event`, returning how many receivers it reached.
    pub fn emit(&self, event: MenuEvent) -> usize {
        let kind = event.event_type();
        let reached = self.tx.send(event).unwrap_or(0);
        debug!(kind, reached, "menu event emitted");
        reached
    }

    /// Every notification emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<MenuEvent> {
        self.tx.subscribe()
    }

    /// Only document replacements.
    pub fn subscribe_documents(&self) -> DocumentUpdates {
        DocumentUpdates {
            rx: self.tx.subscribe(),
        }
    }

    /// Only catalog snapshots and catalog failures.
    pub fn subscribe_catalog(&self) -> CatalogUpdates {
        CatalogUpdates {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a catalog read as seen by subscribers.
#[derive(Clone, Debug)]
pub enum CatalogUpdate {
    /// A fresh snapshot replaced the previous one.
    Loaded(Arc<Vec<InstalledPlugin>>),
    /// The read failed and the previous snapshot stays current.
    Unavailable(String),
}

/// Receiver of [`MenuEvent::DocumentChanged`] payloads.
#[derive(Debug)]
pub struct DocumentUpdates {
    rx: broadcast::Receiver<MenuEvent>,
}

impl DocumentUpdates {
    /// Wait for the next document. `None` once the emitter is gone.
    pub async fn recv(&mut self) -> Option<Arc<Document>> {
        loop {
            match self.rx.recv().await {
                Ok(MenuEvent::DocumentChanged { document, .. }) => return Some(document),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "document receiver lagged"),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The newest document already queued, skipping older ones.
    pub fn latest(&mut self) -> Option<Arc<Document>> {
        let mut newest = None;
        loop {
            match self.rx.try_recv() {
                Ok(MenuEvent::DocumentChanged { document, .. }) => newest = Some(document),
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return newest,
            }
        }
    }
}

/// Receiver of catalog notifications.
#[derive(Debug)]
pub struct CatalogUpdates {
    rx: broadcast::Receiver<MenuEvent>,
}

impl CatalogUpdates {
    /// Wait for the next catalog outcome. `None` once the emitter is gone.
    pub async fn recv(&mut self) -> Option<CatalogUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(MenuEvent::CatalogLoaded { plugins }) => {
                    return Some(CatalogUpdate::Loaded(plugins));
                }
                Ok(MenuEvent::CatalogUnavailable { reason }) => {
                    return Some(CatalogUpdate::Unavailable(reason));
                }
                Ok(MenuEvent::DocumentChanged { .. }) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "catalog receiver lagged"),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use handymenu_core::Collection;

    use super::*;

    fn changed(title: &str) -> MenuEvent {
        MenuEvent::document_changed(Arc::new(Document::with_collections(vec![
            Collection::new(title),
        ])))
    }

    fn loaded() -> MenuEvent {
        MenuEvent::CatalogLoaded {
            plugins: Arc::new(Vec::new()),
        }
    }

    #[test]
    fn emit_without_subscribers_reaches_nobody() {
        let emitter = EventEmitter::new();
        assert_eq!(emitter.emit(changed("Work")), 0);
    }

    #[tokio::test]
    async fn raw_subscribers_see_every_kind() {
        let emitter = EventEmitter::new();
        let mut rx = emitter.subscribe();
        assert_eq!(emitter.emit(changed("Work")), 1);
        let _ = emitter.emit(loaded());

        assert_eq!(rx.recv().await.unwrap().event_type(), "document_changed");
        assert_eq!(rx.recv().await.unwrap().event_type(), "catalog_loaded");
    }

    #[tokio::test]
    async fn document_updates_skip_catalog_events() {
        let emitter = EventEmitter::new();
        let mut documents = emitter.subscribe_documents();
        let _ = emitter.emit(loaded());
        let _ = emitter.emit(changed("Work"));

        let doc = documents.recv().await.unwrap();
        assert_eq!(doc.collections[0].title, "Work");
    }

    #[tokio::test]
    async fn catalog_updates_report_failures() {
        let emitter = EventEmitter::new();
        let mut catalog = emitter.subscribe_catalog();
        let _ = emitter.emit(changed("Work"));
        let _ = emitter.emit(MenuEvent::CatalogUnavailable {
            reason: "host returned no data".into(),
        });
        let _ = emitter.emit(loaded());

        assert_matches!(catalog.recv().await, Some(CatalogUpdate::Unavailable(ref r)) if r.contains("no data"));
        assert_matches!(catalog.recv().await, Some(CatalogUpdate::Loaded(_)));
    }

    #[tokio::test]
    async fn lagged_document_receiver_resumes_with_newer_snapshot() {
        let emitter = EventEmitter::with_capacity(2);
        let mut documents = emitter.subscribe_documents();
        for title in ["A", "B", "C"] {
            let _ = emitter.emit(changed(title));
        }

        let doc = documents.recv().await.unwrap();
        assert_eq!(doc.collections[0].title, "B");
    }

    #[test]
    fn latest_returns_newest_queued_document() {
        let emitter = EventEmitter::new();
        let mut documents = emitter.subscribe_documents();
        assert!(documents.latest().is_none());

        let _ = emitter.emit(changed("Work"));
        let _ = emitter.emit(loaded());
        let _ = emitter.emit(changed("Play"));
        assert_eq!(documents.latest().unwrap().collections[0].title, "Play");
        assert!(documents.latest().is_none());
    }

    #[tokio::test]
    async fn receivers_end_when_emitter_drops() {
        let emitter = EventEmitter::new();
        let mut documents = emitter.subscribe_documents();
        let mut catalog = emitter.subscribe_catalog();
        assert_eq!(emitter.subscriber_count(), 2);
        drop(emitter);

        assert!(documents.recv().await.is_none());
        assert!(catalog.recv().await.is_none());
    }
}
