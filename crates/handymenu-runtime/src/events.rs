//! Notifications published to the settings window and the menu renderer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use handymenu_core::{Document, InstalledPlugin};

/// Something subscribers should re-render for.
#[derive(Clone, Debug)]
pub enum MenuEvent {
    /// The authoritative document was replaced (load or successful save).
    DocumentChanged {
        /// The new document.
        document: Arc<Document>,
        /// When the change was published.
        at: DateTime<Utc>,
    },
    /// A fresh catalog snapshot is available.
    CatalogLoaded {
        /// Installed plugins, sorted by name.
        plugins: Arc<Vec<InstalledPlugin>>,
    },
    /// The catalog could not be read. The previous snapshot stays current.
    CatalogUnavailable {
        /// Why the read failed.
        reason: String,
    },
}

impl MenuEvent {
    /// Wire-style name of the event.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::DocumentChanged { .. } => "document_changed",
            Self::CatalogLoaded { .. } => "catalog_loaded",
            Self::CatalogUnavailable { .. } => "catalog_unavailable",
        }
    }

    /// Event announcing `document` now.
    pub fn document_changed(document: Arc<Document>) -> Self {
        Self::DocumentChanged {
            document,
            at: Utc::now(),
        }
    }
}
