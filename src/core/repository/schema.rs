//! core::repository::schema
//!
//! Persisted repository records.
//!
//! # Files
//!
//! ```toml
//! # config.toml
//! game_version = "1.20.1"
//! loader = "Forge"
//! ```
//!
//! ```toml
//! # tmod.lock
//! [waystones]
//! timestamp = "2023-09-14T18:22:05.307Z"
//! clientOnly = false
//! dependencies = ["balm"]
//!
//! [balm]
//! timestamp = "2023-09-10T08:01:44.117Z"
//! clientOnly = false
//! dependencies = []
//! ```
//!
//! Unknown fields are rejected so that a typo in a hand-edited file is
//! reported instead of silently ignored.

use serde::{Deserialize, Serialize};

use crate::core::types::{GameVersion, ModLoader, Slug};

/// Target game version and loader, fixed when the repository is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub game_version: GameVersion,
    pub loader: ModLoader,
}

impl Configuration {
    pub fn new(game_version: GameVersion, loader: ModLoader) -> Self {
        Self {
            game_version,
            loader,
        }
    }
}

/// The pinned file recorded for one slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LockEntry {
    /// The registry's `fileDate` of the pinned file, used as an opaque
    /// version token.
    pub timestamp: String,
    /// Skip this mod (when it is a root) on `install --server`.
    pub client_only: bool,
    /// Direct required/embedded dependencies, in registry order.
    #[serde(default)]
    pub dependencies: Vec<Slug>,
}

impl LockEntry {
    pub fn new(timestamp: impl Into<String>, client_only: bool, dependencies: Vec<Slug>) -> Self {
        Self {
            timestamp: timestamp.into(),
            client_only,
            dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_toml_shape() {
        let config = Configuration::new(GameVersion::new("1.20.1").unwrap(), ModLoader::Forge);
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("game_version = \"1.20.1\""));
        assert!(text.contains("loader = \"Forge\""));
    }

    #[test]
    fn configuration_rejects_unknown_loader() {
        let parsed: Result<Configuration, _> =
            toml::from_str("game_version = \"1.20.1\"\nloader = \"Rift\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn lock_entry_uses_camel_case() {
        let entry = LockEntry::new("2023-01-01T00:00:00Z", true, vec![]);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"clientOnly\":true"));
    }

    #[test]
    fn lock_entry_dependencies_default_to_empty() {
        let entry: LockEntry =
            toml::from_str("timestamp = \"t\"\nclientOnly = false\n").unwrap();
        assert!(entry.dependencies.is_empty());
    }

    #[test]
    fn lock_entry_rejects_unknown_fields() {
        let parsed: Result<LockEntry, _> =
            toml::from_str("timestamp = \"t\"\nclientOnly = false\nhash = \"x\"\n");
        assert!(parsed.is_err());
    }
}
