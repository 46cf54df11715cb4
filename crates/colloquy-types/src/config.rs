//! Storage configuration types for Colloquy.
//!
//! `StorageConfig` controls which backend the registry resolves and how the
//! reference store persists. All fields have defaults so an empty config
//! file yields a working reference store.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The backend families a storage kind can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// In-memory store with an append-only journal. Always available.
    Reference,
    /// Vector-database backend (external adapter).
    Vector,
    /// Graph-database backend (external adapter).
    Graph,
    /// Relational-database backend (external adapter).
    Relational,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Reference => write!(f, "reference"),
            StorageKind::Vector => write!(f, "vector"),
            StorageKind::Graph => write!(f, "graph"),
            StorageKind::Relational => write!(f, "relational"),
        }
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(StorageKind::Reference),
            "vector" => Ok(StorageKind::Vector),
            "graph" => Ok(StorageKind::Graph),
            "relational" => Ok(StorageKind::Relational),
            other => Err(format!("unknown storage kind: '{other}'")),
        }
    }
}

/// Configuration for conversation storage.
///
/// `storage_kind` is kept as a raw string so an unrecognized value can be
/// recovered at resolution time (fall back to `fallback_kind` with a
/// warning) instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Requested backend kind. Unrecognized values fall back.
    #[serde(default = "default_storage_kind")]
    pub storage_kind: String,

    /// Backend used when `storage_kind` is unrecognized.
    #[serde(default = "default_fallback_kind")]
    pub fallback_kind: StorageKind,

    /// When true, an unrecognized `storage_kind` is a configuration error
    /// instead of a silent fallback.
    #[serde(default)]
    pub strict_kind: bool,

    /// When false, writes are silent no-ops and reads serve whatever was
    /// loaded at startup.
    #[serde(default = "default_true")]
    pub enable_storage: bool,

    /// When false, the reference store skips the journal entirely.
    #[serde(default = "default_true")]
    pub persist_to_disk: bool,

    /// Directory holding the journal files.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

fn default_storage_kind() -> String {
    "reference".to_string()
}

fn default_fallback_kind() -> StorageKind {
    StorageKind::Reference
}

fn default_true() -> bool {
    true
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/conversations")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_kind: default_storage_kind(),
            fallback_kind: default_fallback_kind(),
            strict_kind: false,
            enable_storage: true,
            persist_to_disk: true,
            storage_path: default_storage_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_kind_roundtrip() {
        for kind in [
            StorageKind::Reference,
            StorageKind::Vector,
            StorageKind::Graph,
            StorageKind::Relational,
        ] {
            let s = kind.to_string();
            let parsed: StorageKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_storage_kind_rejects_unknown() {
        assert!("blockchain".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_config_default_values() {
        let config = StorageConfig::default();
        assert_eq!(config.storage_kind, "reference");
        assert_eq!(config.fallback_kind, StorageKind::Reference);
        assert!(!config.strict_kind);
        assert!(config.enable_storage);
        assert!(config.persist_to_disk);
        assert_eq!(config.storage_path, PathBuf::from("data/conversations"));
    }

    #[test]
    fn test_config_deserialize_empty_toml() {
        let config: StorageConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage_kind, "reference");
        assert!(config.enable_storage);
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
storage_kind = "vector"
fallback_kind = "reference"
strict_kind = true
enable_storage = false
storage_path = "/tmp/colloquy"
"#;
        let config: StorageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.storage_kind, "vector");
        assert!(config.strict_kind);
        assert!(!config.enable_storage);
        assert!(config.persist_to_disk);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/colloquy"));
    }

    #[test]
    fn test_config_tolerates_unrecognized_kind_string() {
        // The raw string survives deserialization; resolution decides later.
        let config: StorageConfig = toml::from_str(r#"storage_kind = "cosmos""#).unwrap();
        assert_eq!(config.storage_kind, "cosmos");
        assert!(config.storage_kind.parse::<StorageKind>().is_err());
    }
}
