//! # handymenu-settings
//!
//! Layered configuration for Handy Menu.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`MenuSettings::default()`]
//! 2. **User file**: `~/.handymenu/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `HANDYMENU_*` overrides (highest priority)
//!
//! There is no global instance. The composition root loads settings once
//! and passes them to whatever needs them.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, load_with_env, settings_path};
pub use types::{CatalogSettings, EventSettings, LoggingSettings, MenuSettings, StorageSettings};
