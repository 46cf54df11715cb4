//! In-memory exchange store with an append-only journal.
//!
//! The in-memory collection is the authoritative read path; the journal is
//! the crash-recovery source of truth. Every mutation appends a record
//! (adds and delete tombstones) and updates memory under one write lock, so
//! readers never observe one side without the other.
//!
//! Journal I/O failures are logged and swallowed: the store stays available
//! and keeps serving from memory. Recovery is a blocking step of `open`,
//! never a background task, so the store cannot be read before replay
//! finishes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use colloquy_core::embedding::box_embedder::BoxEmbedder;
use colloquy_core::storage::provider::StorageProvider;
use colloquy_core::threading::group_into_threads;
use colloquy_types::config::StorageConfig;
use colloquy_types::error::StorageError;
use colloquy_types::exchange::{Exchange, ExchangeDraft, Thread};

use crate::journal::Journal;

const JOURNAL_FILE: &str = "exchanges.jsonl";

/// One journal line: an add, or a delete tombstone.
///
/// The log is append-only; deletion durability is a tombstone record, never
/// an in-place rewrite.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum ExchangeRecord {
    Add(Exchange),
    Delete { conversation_id: String },
}

struct StoreState {
    exchanges: Vec<Exchange>,
    journal: Option<Journal>,
}

/// Reference `StorageProvider`: in-memory collection plus JSONL journal.
///
/// Lookups are linear scans over the collection -- an accepted trade-off for
/// the reference implementation, not a production-scale index.
pub struct MemoryStore {
    enable_storage: bool,
    embedder: Option<BoxEmbedder>,
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Open the store, replaying the journal before returning.
    ///
    /// Never fails: an unopenable or corrupt journal degrades to an empty
    /// (or memory-only) store with a warning.
    pub async fn open(config: &StorageConfig) -> Self {
        let journal = if config.persist_to_disk {
            match Journal::open(config.storage_path.join(JOURNAL_FILE)).await {
                Ok(journal) => Some(journal),
                Err(e) => {
                    warn!(error = %e, "journal unavailable, running memory-only");
                    None
                }
            }
        } else {
            None
        };

        let exchanges = match &journal {
            Some(journal) => replay(journal.load().await),
            None => Vec::new(),
        };
        if !exchanges.is_empty() {
            info!(count = exchanges.len(), "recovered exchanges from journal");
        }

        Self {
            enable_storage: config.enable_storage,
            embedder: None,
            state: RwLock::new(StoreState { exchanges, journal }),
        }
    }

    /// Attach an embedder used to fill in missing embeddings during `add`.
    pub fn with_embedder(mut self, embedder: BoxEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Atomically drop every exchange and truncate the journal.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.exchanges.clear();
        if let Some(journal) = state.journal.as_mut() {
            if let Err(e) = journal.clear().await {
                warn!(error = %e, "journal truncation failed");
            }
        }
        Ok(())
    }
}

/// Rebuild the in-memory collection from journal records.
fn replay(records: Vec<ExchangeRecord>) -> Vec<Exchange> {
    let mut exchanges: Vec<Exchange> = Vec::with_capacity(records.len());
    for record in records {
        match record {
            ExchangeRecord::Add(exchange) => exchanges.push(exchange),
            ExchangeRecord::Delete { conversation_id } => {
                exchanges.retain(|e| e.conversation_id != conversation_id);
            }
        }
    }
    exchanges
}

impl StorageProvider for MemoryStore {
    async fn add(&self, draft: ExchangeDraft) -> Result<Exchange, StorageError> {
        if draft.prompt.trim().is_empty() {
            return Err(StorageError::Validation("prompt must not be empty".into()));
        }
        if draft.response.trim().is_empty() {
            return Err(StorageError::Validation("response must not be empty".into()));
        }

        let mut draft = draft;
        if draft.embedding.is_none() {
            if let Some(embedder) = &self.embedder {
                let text = format!("User: {}\nAssistant: {}", draft.prompt, draft.response);
                match embedder.embed(&text).await {
                    Ok(vector) => draft.embedding = Some(vector),
                    Err(e) => {
                        warn!(error = %e, "embedding failed, storing without vector");
                    }
                }
            }
        }

        let exchange = draft.into_exchange(Utc::now());
        if !self.enable_storage {
            debug!(
                conversation_id = %exchange.conversation_id,
                "storage disabled, dropping exchange"
            );
            return Ok(exchange);
        }

        let mut state = self.state.write().await;
        if let Some(journal) = state.journal.as_mut() {
            if let Err(e) = journal.append(&ExchangeRecord::Add(exchange.clone())).await {
                warn!(
                    error = %e,
                    conversation_id = %exchange.conversation_id,
                    "journal append failed, exchange kept in memory only"
                );
            }
        }
        state.exchanges.push(exchange.clone());
        Ok(exchange)
    }

    async fn get_by_conversation(
        &self,
        conversation_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Exchange>, StorageError> {
        let state = self.state.read().await;
        let mut matches: Vec<Exchange> = state
            .exchanges
            .iter()
            .filter(|e| e.conversation_id == conversation_id)
            .cloned()
            .collect();
        // Insertion order is chronological within a conversation; the limit
        // keeps the most recent window without reordering it.
        if let Some(limit) = limit {
            if matches.len() > limit {
                matches = matches.split_off(matches.len() - limit);
            }
        }
        Ok(matches)
    }

    async fn get_thread(
        &self,
        thread_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Exchange>, StorageError> {
        let state = self.state.read().await;
        let mut matches: Vec<Exchange> = state
            .exchanges
            .iter()
            .filter(|e| e.thread_id == thread_id)
            .filter(|e| user_id.is_none_or(|user| e.user_id == user))
            .cloned()
            .collect();
        matches.sort_by_key(|e| e.timestamp);
        Ok(matches)
    }

    async fn get_recent_threads(
        &self,
        user_id: &str,
        site: &str,
        limit: usize,
    ) -> Result<Vec<Thread>, StorageError> {
        let matches: Vec<Exchange> = {
            let state = self.state.read().await;
            state
                .exchanges
                .iter()
                .filter(|e| e.user_id == user_id && e.site == site)
                .cloned()
                .collect()
        };
        Ok(group_into_threads(matches, limit))
    }

    async fn delete(
        &self,
        conversation_id: &str,
        user_id: Option<&str>,
    ) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        let owner = state
            .exchanges
            .iter()
            .find(|e| e.conversation_id == conversation_id)
            .map(|e| e.user_id.clone());
        let Some(owner) = owner else {
            return Ok(false);
        };
        if user_id.is_some_and(|user| owner != user) {
            return Ok(false);
        }

        if let Some(journal) = state.journal.as_mut() {
            let tombstone = ExchangeRecord::Delete {
                conversation_id: conversation_id.to_string(),
            };
            if let Err(e) = journal.append(&tombstone).await {
                warn!(
                    error = %e,
                    conversation_id,
                    "tombstone append failed, delete applied in memory only"
                );
            }
        }
        state.exchanges.retain(|e| e.conversation_id != conversation_id);
        Ok(true)
    }

    async fn search(
        &self,
        query: &str,
        user_id: Option<&str>,
        site: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Exchange>, StorageError> {
        let needle = query.to_lowercase();
        let state = self.state.read().await;
        let mut matches: Vec<Exchange> = state
            .exchanges
            .iter()
            .filter(|e| user_id.is_none_or(|user| e.user_id == user))
            .filter(|e| site.is_none_or(|s| e.site == s))
            .filter(|e| matches_query(e, &needle))
            .cloned()
            .collect();
        // Relevance for the reference backend is recency.
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches.truncate(limit);
        Ok(matches)
    }
}

fn matches_query(exchange: &Exchange, needle: &str) -> bool {
    if exchange.prompt.to_lowercase().contains(needle)
        || exchange.response.to_lowercase().contains(needle)
    {
        return true;
    }
    if let Some(summary) = &exchange.summary {
        if summary.to_lowercase().contains(needle) {
            return true;
        }
    }
    if let Some(topics) = &exchange.topics {
        if topics.iter().any(|t| t.to_lowercase().contains(needle)) {
            return true;
        }
    }
    false
}
