//! Exchange, draft, and thread types for Colloquy.
//!
//! An `Exchange` is one persisted prompt/response pair with metadata.
//! A `Thread` is a derived, time-ordered grouping of exchanges sharing a
//! thread id -- threads are never persisted, only reconstructed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted prompt/response pair.
///
/// `conversation_id` is globally unique and immutable once assigned;
/// `thread_id` may be shared by many exchanges. Exchanges are immutable
/// after creation except for deletion.
///
/// Ids are strings rather than `Uuid` because callers (web frontends,
/// migrated legacy data) supply their own identifiers; generated ids are
/// UUIDv7 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub conversation_id: String,
    pub thread_id: String,
    pub user_id: String,
    pub site: String,
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    /// Pre-computed embedding vector, when a backend or caller provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Generated summary of the exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Main topics, in caller-supplied order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    /// Participant descriptors, in caller-supplied order. Kept as raw JSON
    /// maps because their shape is owned by the transport layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<serde_json::Value>>,
}

/// Input to the `add` operation: an exchange before the store has assigned
/// identifiers and a timestamp.
///
/// `conversation_id` and `thread_id` are optional; the store generates a
/// fresh UUIDv7 string for each missing one.
#[derive(Debug, Clone, Default)]
pub struct ExchangeDraft {
    pub user_id: String,
    pub site: String,
    pub thread_id: Option<String>,
    pub prompt: String,
    pub response: String,
    pub conversation_id: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub summary: Option<String>,
    pub topics: Option<Vec<String>>,
    pub participants: Option<Vec<serde_json::Value>>,
}

impl ExchangeDraft {
    /// Minimal draft with the four required fields.
    pub fn new(
        user_id: impl Into<String>,
        site: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            site: site.into(),
            prompt: prompt.into(),
            response: response.into(),
            ..Self::default()
        }
    }

    /// Attach this draft to an existing thread.
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Use a caller-supplied conversation id instead of a generated one.
    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Materialize the draft into a full `Exchange`, generating any missing
    /// identifiers and stamping the creation time.
    pub fn into_exchange(self, timestamp: DateTime<Utc>) -> Exchange {
        Exchange {
            conversation_id: self
                .conversation_id
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            thread_id: self.thread_id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            user_id: self.user_id,
            site: self.site,
            prompt: self.prompt,
            response: self.response,
            timestamp,
            embedding: self.embedding,
            summary: self.summary,
            topics: self.topics,
            participants: self.participants,
        }
    }
}

/// A derived, read-only view of one conversation thread.
///
/// `exchanges` is sorted by timestamp ascending (oldest first). Threads are
/// reconstructed from the flat exchange collection on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    pub site: String,
    pub exchanges: Vec<Exchange>,
}

impl Thread {
    /// Timestamp of the most recent exchange, or `None` for an empty thread.
    pub fn last_active(&self) -> Option<DateTime<Utc>> {
        self.exchanges.last().map(|e| e.timestamp)
    }
}

/// A conversation record exported from a legacy client store.
///
/// Deliberately tolerant: every field is optional so a malformed record
/// deserializes rather than aborting a whole migration batch. Records
/// without both a prompt and a response are skipped by the migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRecord {
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Older exports used `message_id` for the thread grouping key.
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl LegacyRecord {
    /// The thread grouping key, preferring the modern field name.
    pub fn thread_key(&self) -> Option<&str> {
        self.thread_id.as_deref().or(self.message_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExchangeDraft {
        ExchangeDraft::new("user-1", "example.org", "What is Rust?", "A systems language.")
    }

    #[test]
    fn test_draft_generates_missing_ids() {
        let exchange = draft().into_exchange(Utc::now());
        assert!(!exchange.conversation_id.is_empty());
        assert!(!exchange.thread_id.is_empty());
        assert_ne!(exchange.conversation_id, exchange.thread_id);
    }

    #[test]
    fn test_draft_keeps_supplied_ids() {
        let exchange = draft()
            .with_conversation_id("conv-42")
            .in_thread("thread-7")
            .into_exchange(Utc::now());
        assert_eq!(exchange.conversation_id, "conv-42");
        assert_eq!(exchange.thread_id, "thread-7");
    }

    #[test]
    fn test_exchange_serde_roundtrip() {
        let mut exchange = draft().into_exchange(Utc::now());
        exchange.topics = Some(vec!["rust".to_string(), "storage".to_string()]);
        let json = serde_json::to_string(&exchange).unwrap();
        let parsed: Exchange = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.conversation_id, exchange.conversation_id);
        assert_eq!(parsed.topics.as_deref(), Some(&["rust".to_string(), "storage".to_string()][..]));
    }

    #[test]
    fn test_exchange_omits_absent_optional_fields() {
        let exchange = draft().into_exchange(Utc::now());
        let json = serde_json::to_string(&exchange).unwrap();
        assert!(!json.contains("embedding"));
        assert!(!json.contains("summary"));
        assert!(!json.contains("participants"));
    }

    #[test]
    fn test_thread_last_active() {
        let older = draft().into_exchange(Utc::now() - chrono::Duration::minutes(5));
        let newer = draft().into_exchange(Utc::now());
        let thread = Thread {
            thread_id: "t".to_string(),
            site: "example.org".to_string(),
            exchanges: vec![older, newer.clone()],
        };
        assert_eq!(thread.last_active(), Some(newer.timestamp));

        let empty = Thread {
            thread_id: "t".to_string(),
            site: "example.org".to_string(),
            exchanges: vec![],
        };
        assert_eq!(empty.last_active(), None);
    }

    #[test]
    fn test_legacy_record_tolerates_partial_json() {
        let record: LegacyRecord =
            serde_json::from_str(r#"{"message_id": "m1", "prompt": "hi"}"#).unwrap();
        assert_eq!(record.thread_key(), Some("m1"));
        assert!(record.response.is_none());

        let modern: LegacyRecord =
            serde_json::from_str(r#"{"thread_id": "t1", "message_id": "m1"}"#).unwrap();
        assert_eq!(modern.thread_key(), Some("t1"));
    }
}
