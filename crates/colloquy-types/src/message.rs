//! Lightweight chat message type.
//!
//! The simple variant used by the message log: no thread structure, no
//! metadata, just sender/content pairs in append order. Sequence within a
//! conversation is implicit insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single chat message in the lightweight store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub conversation_id: String,
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    pub fn new(
        conversation_id: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serde_roundtrip() {
        let msg = ChatMessage::new("c1", "alice", "hello");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.conversation_id, "c1");
        assert_eq!(parsed.sender, "alice");
        assert_eq!(parsed.content, "hello");
    }
}
