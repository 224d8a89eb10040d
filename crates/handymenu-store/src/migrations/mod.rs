//! Persisted-document migrations.
//!
//! Migrations operate on the raw JSON tree before it is decoded into a
//! [`Document`](handymenu_core::Document), and are applied in version order
//! starting just above the version found in the bytes. A document whose
//! version cannot be determined, or is newer than this build understands,
//! is rejected so the caller can treat it as absent.

use handymenu_core::CURRENT_SCHEMA_VERSION;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// One step that upgrades a tree from `version - 1` to `version`.
struct Migration {
    version: u32,
    description: &'static str,
    apply: fn(&mut Map<String, Value>),
}

/// All migrations in version order.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 2,
    description: "schemaVersion field, commandName on command items",
    apply: v002_schema_version,
}];

/// Schema version a raw tree was written with.
///
/// Schema 1 predates `schemaVersion` and is recognised by its
/// `pluginVersion` string.
pub fn detect_version(root: &Map<String, Value>) -> Option<u32> {
    if let Some(version) = root.get("schemaVersion") {
        return version.as_u64().and_then(|v| u32::try_from(v).ok());
    }
    root.contains_key("pluginVersion").then_some(1)
}

/// Upgrade `root` to [`CURRENT_SCHEMA_VERSION`].
///
/// Returns `None` when the tree is not an object, its version is unknown,
/// or it is newer than this build.
pub fn migrate(root: Value) -> Option<Value> {
    let Value::Object(mut map) = root else {
        warn!("persisted document is not a JSON object");
        return None;
    };
    let Some(found) = detect_version(&map) else {
        warn!("persisted document has no recognisable schema version");
        return None;
    };
    if found > CURRENT_SCHEMA_VERSION {
        warn!(
            found,
            supported = CURRENT_SCHEMA_VERSION,
            "persisted document is newer than this build"
        );
        return None;
    }

    for migration in MIGRATIONS {
        if migration.version <= found {
            debug!(
                version = migration.version,
                "document migration already applied, skipping"
            );
            continue;
        }
        info!(
            version = migration.version,
            description = migration.description,
            "applying document migration"
        );
        (migration.apply)(&mut map);
        let _ = map.insert("schemaVersion".into(), Value::from(migration.version));
    }

    Some(Value::Object(map))
}

/// Return the latest migration version defined in code.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(1, |m| m.version)
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn v002_schema_version(root: &mut Map<String, Value>) {
    let _ = root.remove("pluginVersion");
    let Some(Value::Array(collections)) = root.get_mut("collections") else {
        return;
    };
    for collection in collections {
        let Some(Value::Array(items)) = collection.get_mut("items") else {
            continue;
        };
        for item in items.iter_mut().filter_map(Value::as_object_mut) {
            if item.contains_key("commandName") {
                continue;
            }
            if let Some(name) = item.remove("name") {
                let _ = item.insert("commandName".into(), name);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn latest_matches_current_schema() {
        assert_eq!(latest_version(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn detects_versions() {
        assert_eq!(detect_version(&object(json!({"schemaVersion": 2}))), Some(2));
        assert_eq!(detect_version(&object(json!({"pluginVersion": "1.2"}))), Some(1));
        assert_eq!(detect_version(&object(json!({"collections": []}))), None);
        assert_eq!(detect_version(&object(json!({"schemaVersion": "two"}))), None);
    }

    #[test]
    fn upgrades_schema_one() {
        let legacy = json!({
            "pluginVersion": "1.0.3",
            "collections": [{
                "title": "Work",
                "items": [
                    {"kind": "command", "pluginID": "p", "commandID": "c", "name": "Run", "pluginName": "P"},
                    {"kind": "separator"}
                ]
            }]
        });
        let upgraded = migrate(legacy).unwrap();
        assert_eq!(
            upgraded,
            json!({
                "schemaVersion": 2,
                "collections": [{
                    "title": "Work",
                    "items": [
                        {"kind": "command", "pluginID": "p", "commandID": "c", "commandName": "Run", "pluginName": "P"},
                        {"kind": "separator"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn current_version_passes_through() {
        let doc = json!({"schemaVersion": 2, "collections": [], "extra": true});
        assert_eq!(migrate(doc.clone()), Some(doc));
    }

    #[test]
    fn newer_or_unknown_versions_are_rejected() {
        assert!(migrate(json!({"schemaVersion": 99, "collections": []})).is_none());
        assert!(migrate(json!({"collections": []})).is_none());
        assert!(migrate(json!([1, 2, 3])).is_none());
    }
}
