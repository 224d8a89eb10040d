//! # handymenu-store
//!
//! Persistence for the Handy Menu document.
//!
//! - [`KeyValueStore`]: the opaque get/set byte store the platform supplies,
//!   with [`MemoryStore`] and [`SqliteStore`] backends
//! - [`migrations`]: upgrades older persisted layouts to
//!   [`CURRENT_SCHEMA_VERSION`](handymenu_core::CURRENT_SCHEMA_VERSION)
//! - [`DataCaretaker`]: encodes, decodes and stores the document under one
//!   fixed key, degrading unreadable bytes to "absent"

#![deny(unsafe_code)]

pub mod caretaker;
pub mod errors;
pub mod kv;
pub mod migrations;
pub mod sqlite;

pub use caretaker::DataCaretaker;
pub use errors::{Result, StoreError};
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::{SqliteConfig, SqliteStore};
