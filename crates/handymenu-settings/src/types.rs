//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`
//! so a settings file may name only the values it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuSettings {
    /// Where the document is persisted.
    pub storage: StorageSettings,
    /// Host catalog behaviour.
    pub catalog: CatalogSettings,
    /// Notification channel sizing.
    pub events: EventSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Persistence location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Namespace the data key lives under.
    pub namespace: String,
    /// Key of the persisted document inside the namespace.
    pub data_key: String,
    /// `SQLite` database file. `None` keeps the document in memory only.
    pub database_path: Option<PathBuf>,
}

impl StorageSettings {
    /// The fixed, namespaced key the document is stored under.
    pub fn store_key(&self) -> String {
        format!("{}/{}", self.namespace, self.data_key)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: "com.sergeishere.plugins.handymenu".into(),
            data_key: "plugin_sketch_handymenu_data".into(),
            database_path: None,
        }
    }
}

/// Catalog behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    /// Name of the host plugin that hosts the menu, excluded from the catalog.
    pub host_plugin_name: String,
    /// Quiet period before a catalog search runs.
    pub search_debounce_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            host_plugin_name: "Handy Menu".into(),
            search_debounce_ms: 120,
        }
    }
}

/// Event channel sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSettings {
    /// Broadcast channel capacity. Slow subscribers lag past this many events.
    pub channel_capacity: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

/// Log output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = MenuSettings::default();
        assert_eq!(
            settings.storage.store_key(),
            "com.sergeishere.plugins.handymenu/plugin_sketch_handymenu_data"
        );
        assert_eq!(settings.catalog.host_plugin_name, "Handy Menu");
        assert_eq!(settings.catalog.search_debounce_ms, 120);
        assert_eq!(settings.events.channel_capacity, 256);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.storage.database_path.is_none());
    }

    #[test]
    fn camel_case_wire_names() {
        let json = serde_json::to_value(MenuSettings::default()).unwrap();
        assert_eq!(json["storage"]["dataKey"], "plugin_sketch_handymenu_data");
        assert_eq!(json["catalog"]["searchDebounceMs"], 120);
        assert_eq!(json["events"]["channelCapacity"], 256);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let settings: MenuSettings =
            serde_json::from_str(r#"{"catalog": {"hostPluginName": "Menu Dev"}}"#).unwrap();
        assert_eq!(settings.catalog.host_plugin_name, "Menu Dev");
        assert_eq!(settings.catalog.search_debounce_ms, 120);
    }
}
