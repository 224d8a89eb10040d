//! # handymenu-core
//!
//! Collection data model and pure editing operations for Handy Menu.
//!
//! This crate is the shared vocabulary every other Handy Menu crate depends on:
//!
//! - **Model**: [`Document`] → [`Collection`] → [`CollectionItem`] (a command
//!   reference or a separator), versioned by [`CURRENT_SCHEMA_VERSION`]
//! - **Shortcuts**: [`Shortcut`] as an exact key-code + [`Modifiers`] value
//! - **Operations**: insert, move, remove, rename, auto-grouping and
//!   catalog reconciliation, all free of I/O
//! - **Editor**: [`CollectionEditor`], the working copy behind the settings window
//! - **Catalog**: [`InstalledPlugin`] descriptors and the [`CommandCatalog`] trait
//! - **Errors**: [`MenuError`], the taxonomy shared by model, registry and controller

#![deny(unsafe_code)]

pub mod catalog;
pub mod editor;
pub mod errors;
pub mod model;
pub mod ops;
pub mod shortcut;

pub use catalog::{
    CatalogError, CommandCatalog, HostCommand, HostPlugin, InstalledPlugin, StaticCatalog,
    describe_installed, filter_plugins,
};
pub use editor::CollectionEditor;
pub use errors::{MenuError, Result};
pub use model::{
    CURRENT_SCHEMA_VERSION, Collection, CollectionItem, CommandRef, Document,
    EMPTY_COLLECTION_TITLE,
};
pub use ops::{adjusted_drop_index, reconcile};
pub use shortcut::{Modifiers, Shortcut};
