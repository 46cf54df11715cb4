//! MessageStore trait.
//!
//! The lightweight chat-storage contract: append messages, read them back in
//! append order. No threads, no metadata. Implementations live in
//! `colloquy-infra`.

use colloquy_types::error::StorageError;
use colloquy_types::message::ChatMessage;

/// Append-only message storage scoped by conversation id.
///
/// Read order within a conversation is always the original append order.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait MessageStore: Send + Sync {
    /// Append a message. A disabled store silently drops it.
    fn store(
        &self,
        message: ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// The last `limit` messages of a conversation, append order preserved.
    fn recent(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StorageError>> + Send;

    /// Drop every stored message and truncate any durable log.
    fn clear_all(&self) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
