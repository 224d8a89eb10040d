//! # handymenu-runtime
//!
//! Orchestration for Handy Menu.
//!
//! - [`DataController`]: the single mutation gateway. Loads and reconciles the
//!   document, validates and persists edits, and resolves shortcuts
//! - [`ShortcutRegistry`]: shortcut to collection lookup with uniqueness
//! - [`EventEmitter`]: fan-out of [`MenuEvent`]s, with [`DocumentUpdates`] and
//!   [`CatalogUpdates`] for consumers that want one kind
//! - [`CatalogSearch`]: debounced, cancel-on-supersede catalog filtering
//!
//! The controller is not internally synchronised. Mutations take `&mut self`
//! and must come from one sequential context; concurrent mutation from
//! several contexts is not guarded against.

#![deny(unsafe_code)]

pub mod controller;
pub mod dispatch;
pub mod emitter;
pub mod events;
pub mod registry;
pub mod search;

pub use controller::{ConflictPolicy, ControllerState, DataController};
pub use dispatch::{KeyDisposition, MenuPresenter};
pub use emitter::{CatalogUpdate, CatalogUpdates, DocumentUpdates, EventEmitter};
pub use events::MenuEvent;
pub use registry::{DroppedShortcut, Owner, ShortcutRegistry};
pub use search::{CatalogSearch, SearchResults};
