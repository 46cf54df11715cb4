//! Lightweight message log.
//!
//! Implements `MessageStore` with the same memory-plus-journal shape as
//! `MemoryStore`, minus threads and tombstones: messages are append-only,
//! so the journal holds one plain message record per line.

use tokio::sync::RwLock;
use tracing::{debug, warn};

use colloquy_core::storage::message_store::MessageStore;
use colloquy_types::config::StorageConfig;
use colloquy_types::error::StorageError;
use colloquy_types::message::ChatMessage;

use crate::journal::Journal;

const JOURNAL_FILE: &str = "messages.jsonl";

struct LogState {
    messages: Vec<ChatMessage>,
    journal: Option<Journal>,
}

/// Append-only chat-message store with JSONL durability.
pub struct MessageLog {
    enable_storage: bool,
    state: RwLock<LogState>,
}

impl MessageLog {
    /// Open the log, replaying the journal before returning.
    ///
    /// Degrades to memory-only (with a warning) when the journal cannot be
    /// opened; degrades to empty when it cannot be read.
    pub async fn open(config: &StorageConfig) -> Self {
        let journal = if config.persist_to_disk {
            match Journal::open(config.storage_path.join(JOURNAL_FILE)).await {
                Ok(journal) => Some(journal),
                Err(e) => {
                    warn!(error = %e, "message journal unavailable, running memory-only");
                    None
                }
            }
        } else {
            None
        };

        let messages = match &journal {
            Some(journal) => journal.load().await,
            None => Vec::new(),
        };

        Self {
            enable_storage: config.enable_storage,
            state: RwLock::new(LogState { messages, journal }),
        }
    }
}

impl MessageStore for MessageLog {
    async fn store(&self, message: ChatMessage) -> Result<(), StorageError> {
        if !self.enable_storage {
            debug!(conversation_id = %message.conversation_id, "storage disabled, dropping message");
            return Ok(());
        }

        let mut state = self.state.write().await;
        if let Some(journal) = state.journal.as_mut() {
            if let Err(e) = journal.append(&message).await {
                warn!(
                    error = %e,
                    conversation_id = %message.conversation_id,
                    "journal append failed, message kept in memory only"
                );
            }
        }
        state.messages.push(message);
        Ok(())
    }

    async fn recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, StorageError> {
        let state = self.state.read().await;
        let mut matches: Vec<ChatMessage> = state
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        if matches.len() > limit {
            matches = matches.split_off(matches.len() - limit);
        }
        Ok(matches)
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.messages.clear();
        if let Some(journal) = state.journal.as_mut() {
            if let Err(e) = journal.clear().await {
                warn!(error = %e, "message journal truncation failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(path: &Path) -> StorageConfig {
        StorageConfig {
            storage_path: path.to_path_buf(),
            ..StorageConfig::default()
        }
    }

    #[tokio::test]
    async fn test_append_order_and_window() {
        let dir = tempfile::tempdir().unwrap();
        let log = MessageLog::open(&config(dir.path())).await;

        for content in ["a", "b", "c"] {
            log.store(ChatMessage::new("c1", "alice", content)).await.unwrap();
        }
        log.store(ChatMessage::new("c2", "bob", "elsewhere")).await.unwrap();

        let all = log.recent("c1", 100).await.unwrap();
        let contents: Vec<_> = all.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["a", "b", "c"]);

        let windowed = log.recent("c1", 2).await.unwrap();
        let contents: Vec<_> = windowed.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["b", "c"]);
    }

    #[tokio::test]
    async fn test_messages_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let log = MessageLog::open(&config(dir.path())).await;
            log.store(ChatMessage::new("c1", "alice", "persisted")).await.unwrap();
        }

        let log = MessageLog::open(&config(dir.path())).await;
        let messages = log.recent("c1", 10).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "persisted");
    }

    #[tokio::test]
    async fn test_disabled_storage_drops_messages() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.enable_storage = false;
        let log = MessageLog::open(&cfg).await;

        log.store(ChatMessage::new("c1", "alice", "ghost")).await.unwrap();
        assert!(log.recent("c1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_then_reopen_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = MessageLog::open(&config(dir.path())).await;
        log.store(ChatMessage::new("c1", "alice", "gone")).await.unwrap();
        log.clear_all().await.unwrap();

        assert!(log.recent("c1", 10).await.unwrap().is_empty());

        let reopened = MessageLog::open(&config(dir.path())).await;
        assert!(reopened.recent("c1", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_only_mode_skips_journal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(dir.path());
        cfg.persist_to_disk = false;
        {
            let log = MessageLog::open(&cfg).await;
            log.store(ChatMessage::new("c1", "alice", "volatile")).await.unwrap();
            assert_eq!(log.recent("c1", 10).await.unwrap().len(), 1);
        }

        // Nothing was written, so a reopen starts empty.
        let log = MessageLog::open(&cfg).await;
        assert!(log.recent("c1", 10).await.unwrap().is_empty());
        assert!(!dir.path().join(JOURNAL_FILE).exists());
    }
}
