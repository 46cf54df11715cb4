//! Storage configuration file loading.
//!
//! Reads a TOML `StorageConfig`. A missing file is not an error -- callers
//! get the defaults (reference store, persistence on), matching the
//! zero-config startup path.

use tracing::debug;

use colloquy_types::config::StorageConfig;
use colloquy_types::error::StorageError;

use std::io::ErrorKind;
use std::path::Path;

/// Load a `StorageConfig` from a TOML file.
///
/// Returns defaults when the file does not exist; a file that exists but
/// does not parse is a [`StorageError::Configuration`].
pub async fn load_storage_config(path: impl AsRef<Path>) -> Result<StorageConfig, StorageError> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(text) => toml::from_str(&text).map_err(|e| {
            StorageError::Configuration(format!("invalid config {}: {e}", path.display()))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(StorageConfig::default())
        }
        Err(e) => Err(StorageError::Configuration(format!(
            "read config {}: {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_types::config::StorageKind;

    #[tokio::test]
    async fn test_load_parses_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colloquy.toml");
        tokio::fs::write(
            &path,
            "storage_kind = \"vector\"\nstrict_kind = true\nstorage_path = \"/tmp/conv\"\n",
        )
        .await
        .unwrap();

        let config = load_storage_config(&path).await.unwrap();
        assert_eq!(config.storage_kind, "vector");
        assert!(config.strict_kind);
        assert_eq!(config.fallback_kind, StorageKind::Reference);
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_storage_config(dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config.storage_kind, "reference");
        assert!(config.enable_storage);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        tokio::fs::write(&path, "storage_kind = [not toml").await.unwrap();

        let err = load_storage_config(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }
}
