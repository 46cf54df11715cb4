//! Append-only JSONL journal.
//!
//! One self-describing JSON record per line; records never span lines and
//! the file is never rewritten in place except by `clear`. Appends are
//! flushed and fsynced before they are acknowledged.
//!
//! Recovery tolerates a torn tail: a process killed mid-append leaves a
//! truncated final line, so the loader keeps every record up to the first
//! line that fails to parse and abandons the rest of the file.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use colloquy_types::error::StorageError;

use std::path::{Path, PathBuf};

/// An open append-only journal file.
pub struct Journal {
    path: PathBuf,
    file: File,
}

impl Journal {
    /// Open (or create) the journal at `path`, creating parent directories
    /// as needed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Persistence(format!("create {}: {e}", parent.display())))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::Persistence(format!("open {}: {e}", path.display())))?;
        Ok(Self { path, file })
    }

    /// The journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line, fsynced before returning.
    pub async fn append<T: Serialize>(&mut self, record: &T) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| StorageError::Persistence(format!("serialize record: {e}")))?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::Persistence(format!("append to {}: {e}", self.path.display())))?;
        self.file
            .sync_data()
            .await
            .map_err(|e| StorageError::Persistence(format!("sync {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Truncate the journal to zero length.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.file
            .set_len(0)
            .await
            .map_err(|e| StorageError::Persistence(format!("truncate {}: {e}", self.path.display())))?;
        self.file
            .sync_data()
            .await
            .map_err(|e| StorageError::Persistence(format!("sync {}: {e}", self.path.display())))?;
        Ok(())
    }

    /// Replay all complete records from the journal.
    ///
    /// Never fails: an unreadable file yields an empty vector and the first
    /// malformed line abandons the remainder of the file. Both paths warn so
    /// data loss is observable.
    pub async fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "journal unreadable, starting empty");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "corrupt journal record, discarding remainder of file"
                    );
                    break;
                }
            }
        }
        records
    }
}
