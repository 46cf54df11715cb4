//! Stateless conversation-history facade.
//!
//! Thin async functions that route every call through the process-wide
//! registry. Callers never hold a provider; the singleton lifecycle in
//! [`crate::registry`] hands each call the shared instance.

use tracing::warn;

use colloquy_types::error::StorageError;
use colloquy_types::exchange::{Exchange, ExchangeDraft, LegacyRecord, Thread};

use crate::registry;

/// Persist a new exchange, assigning any missing identifiers.
pub async fn add_conversation(draft: ExchangeDraft) -> Result<Exchange, StorageError> {
    registry::global().client().await?.add(draft).await
}

/// All exchanges sharing `conversation_id`, oldest first; with `limit`,
/// the most recent `limit` of them in chronological order.
pub async fn get_conversation_by_id(
    conversation_id: &str,
    limit: Option<usize>,
) -> Result<Vec<Exchange>, StorageError> {
    registry::global()
        .client()
        .await?
        .get_by_conversation(conversation_id, limit)
        .await
}

/// All exchanges in one thread, timestamp ascending, optionally scoped to
/// an owner.
pub async fn get_conversation_thread(
    thread_id: &str,
    user_id: Option<&str>,
) -> Result<Vec<Exchange>, StorageError> {
    registry::global()
        .client()
        .await?
        .get_thread(thread_id, user_id)
        .await
}

/// The `limit` most-recently-active threads for a user and site, most
/// recent thread first.
pub async fn get_recent_conversations(
    user_id: &str,
    site: &str,
    limit: usize,
) -> Result<Vec<Thread>, StorageError> {
    registry::global()
        .client()
        .await?
        .get_recent_threads(user_id, site, limit)
        .await
}

/// Delete one exchange. `false` when absent or owned by a different user.
pub async fn delete_conversation(
    conversation_id: &str,
    user_id: Option<&str>,
) -> Result<bool, StorageError> {
    registry::global()
        .client()
        .await?
        .delete(conversation_id, user_id)
        .await
}

/// Search exchanges with optional user/site scoping.
pub async fn search_conversations(
    query: &str,
    user_id: Option<&str>,
    site: Option<&str>,
    limit: usize,
) -> Result<Vec<Exchange>, StorageError> {
    registry::global()
        .client()
        .await?
        .search(query, user_id, site, limit)
        .await
}

/// Migrate conversations exported from a legacy client store.
///
/// Best-effort: records without both a prompt and a response are skipped,
/// and a record that fails to store is logged and skipped rather than
/// aborting the batch. Returns the number of records stored.
pub async fn migrate_from_legacy(
    user_id: &str,
    records: Vec<LegacyRecord>,
) -> Result<usize, StorageError> {
    let client = registry::global().client().await?;

    let mut migrated = 0;
    for record in records {
        let (Some(prompt), Some(response)) = (record.prompt.as_deref(), record.response.as_deref())
        else {
            continue;
        };
        if prompt.is_empty() || response.is_empty() {
            continue;
        }

        let mut draft = ExchangeDraft::new(
            user_id,
            record.site.as_deref().unwrap_or("all"),
            prompt,
            response,
        );
        draft.thread_id = record.thread_key().map(str::to_string);

        match client.add(draft).await {
            Ok(_) => migrated += 1,
            Err(e) => {
                warn!(error = %e, "skipping legacy record that failed to store");
            }
        }
    }
    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_types::config::StorageConfig;

    // The facade routes through the process-wide registry, so the whole
    // surface is exercised in one sequential test to keep the global
    // singleton deterministic.
    #[tokio::test]
    async fn test_facade_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        registry::global()
            .configure(StorageConfig {
                storage_path: dir.path().to_path_buf(),
                ..StorageConfig::default()
            })
            .await;

        // Add three exchanges in one conversation-thread.
        for prompt in ["a", "b", "c"] {
            add_conversation(
                ExchangeDraft::new("user-1", "example.org", prompt, format!("re: {prompt}"))
                    .with_conversation_id(format!("conv-{prompt}"))
                    .in_thread("t1"),
            )
            .await
            .unwrap();
        }

        let found = get_conversation_by_id("conv-b", None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].prompt, "b");

        let thread = get_conversation_thread("t1", Some("user-1")).await.unwrap();
        let prompts: Vec<_> = thread.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, ["a", "b", "c"]);

        let threads = get_recent_conversations("user-1", "example.org", 5).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].exchanges.len(), 3);

        let hits = search_conversations("re: b", None, None, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].conversation_id, "conv-b");

        assert!(delete_conversation("conv-b", Some("user-1")).await.unwrap());
        assert!(get_conversation_by_id("conv-b", None).await.unwrap().is_empty());

        // Migration: one good record, one missing a response, one empty.
        let records: Vec<LegacyRecord> = vec![
            serde_json::from_str(
                r#"{"thread_id": "t9", "site": "example.org", "prompt": "old q", "response": "old a"}"#,
            )
            .unwrap(),
            serde_json::from_str(r#"{"prompt": "half a record"}"#).unwrap(),
            serde_json::from_str(r#"{"prompt": "", "response": ""}"#).unwrap(),
        ];
        let migrated = migrate_from_legacy("user-1", records).await.unwrap();
        assert_eq!(migrated, 1);

        let migrated_thread = get_conversation_thread("t9", None).await.unwrap();
        assert_eq!(migrated_thread.len(), 1);
        assert_eq!(migrated_thread[0].site, "example.org");

        // Leave the global registry clean for any other test in this crate.
        registry::global().reset().await;
    }
}
