//! Installed-command catalog: descriptors, the adapter trait and helpers.
//!
//! The catalog is owned by the host. The menu only reads it, either as a
//! snapshot of [`InstalledPlugin`] descriptors or through point lookups with
//! [`CommandCatalog::exists`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::CommandRef;

/// Failure to read the host catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No installed-plugin data could be obtained.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// A plugin and the runnable commands it contributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPlugin {
    /// Display name.
    pub plugin_name: String,
    /// Icon location, when the host provides one.
    #[serde(default)]
    pub icon: Option<String>,
    /// Commands with a run handler.
    #[serde(default)]
    pub commands: Vec<CommandRef>,
}

/// Read-only view of the commands the host can run.
pub trait CommandCatalog: Send + Sync {
    /// Snapshot of every installed plugin.
    fn list_installed(&self) -> Result<Vec<InstalledPlugin>, CatalogError>;

    /// Whether `(plugin_id, command_id)` is currently runnable.
    fn exists(&self, plugin_id: &str, command_id: &str) -> bool;
}

/// Raw command entry as the host reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostCommand {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Identifier inside the plugin.
    #[serde(default)]
    pub identifier: Option<String>,
    /// Whether the command can actually be invoked.
    #[serde(default)]
    pub has_run_handler: bool,
}

/// Raw plugin bundle as the host reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostPlugin {
    /// Plugin identifier.
    pub identifier: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Icon location.
    #[serde(default)]
    pub icon: Option<String>,
    /// Every command the bundle declares.
    #[serde(default)]
    pub commands: Vec<HostCommand>,
}

/// Turn raw host bundles into published descriptors.
///
/// Nameless plugins and the plugin named `own_plugin_name` are skipped, as
/// are commands missing a name, an identifier or a run handler. Plugins are
/// sorted by name.
pub fn describe_installed(host: &[HostPlugin], own_plugin_name: &str) -> Vec<InstalledPlugin> {
    let mut plugins: Vec<InstalledPlugin> = host
        .iter()
        .filter_map(|bundle| {
            let plugin_name = bundle.name.as_deref()?;
            if plugin_name == own_plugin_name {
                return None;
            }
            let commands = bundle
                .commands
                .iter()
                .filter(|command| command.has_run_handler)
                .filter_map(|command| {
                    Some(CommandRef::new(
                        bundle.identifier.clone(),
                        command.identifier.as_deref()?,
                        command.name.as_deref()?,
                        plugin_name,
                    ))
                })
                .collect();
            Some(InstalledPlugin {
                plugin_name: plugin_name.to_owned(),
                icon: bundle.icon.clone(),
                commands,
            })
        })
        .collect();
    plugins.sort_by(|a, b| a.plugin_name.cmp(&b.plugin_name));
    plugins
}

/// Keep plugins whose name, or any of whose command names, contains `query`.
///
/// Matching is case-insensitive and a kept plugin keeps all its commands.
/// An empty query keeps everything.
pub fn filter_plugins(plugins: &[InstalledPlugin], query: &str) -> Vec<InstalledPlugin> {
    if query.is_empty() {
        return plugins.to_vec();
    }
    let needle = query.to_lowercase();
    plugins
        .iter()
        .filter(|plugin| {
            plugin.plugin_name.to_lowercase().contains(&needle)
                || plugin
                    .commands
                    .iter()
                    .any(|command| command.command_name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// In-memory catalog built from a descriptor snapshot.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    plugins: Vec<InstalledPlugin>,
    index: HashSet<(String, String)>,
}

impl StaticCatalog {
    /// Index `plugins` for lookups.
    pub fn new(plugins: Vec<InstalledPlugin>) -> Self {
        let index = plugins
            .iter()
            .flat_map(|plugin| plugin.commands.iter())
            .map(|command| (command.plugin_id.clone(), command.command_id.clone()))
            .collect();
        Self { plugins, index }
    }

    /// Build from raw host bundles, excluding `own_plugin_name`.
    pub fn from_host(host: &[HostPlugin], own_plugin_name: &str) -> Self {
        Self::new(describe_installed(host, own_plugin_name))
    }

    /// Number of runnable commands.
    pub fn command_count(&self) -> usize {
        self.index.len()
    }
}

impl CommandCatalog for StaticCatalog {
    fn list_installed(&self) -> Result<Vec<InstalledPlugin>, CatalogError> {
        Ok(self.plugins.clone())
    }

    fn exists(&self, plugin_id: &str, command_id: &str) -> bool {
        self.index
            .contains(&(plugin_id.to_owned(), command_id.to_owned()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
