//! StorageProvider trait definition.
//!
//! The polymorphic contract all conversation backends satisfy: the reference
//! memory store in `colloquy-infra`, plus any external vector/graph/relational
//! adapters registered with the client registry. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition), so dynamic dispatch goes through
//! `BoxStorageProvider`.

use colloquy_types::error::StorageError;
use colloquy_types::exchange::{Exchange, ExchangeDraft, Thread};

/// Polymorphic contract for conversation storage backends.
///
/// Implementations must be safe for unlimited concurrent use: every method
/// takes `&self` and the registry shares one instance across all callers.
pub trait StorageProvider: Send + Sync {
    /// Persist a new exchange.
    ///
    /// Assigns `conversation_id` and `thread_id` (fresh UUIDv7 strings) when
    /// the draft omits them and stamps the creation time. Returns the fully
    /// populated exchange as persisted. Fails with
    /// [`StorageError::Validation`] when the backend requires non-empty
    /// prompt/response content and either is empty.
    fn add(
        &self,
        draft: ExchangeDraft,
    ) -> impl std::future::Future<Output = Result<Exchange, StorageError>> + Send;

    /// All exchanges sharing `conversation_id`, oldest first.
    ///
    /// With `limit`, only the most recent `limit` exchanges are returned,
    /// chronological order preserved among them. Unknown ids yield an empty
    /// vector, never an error.
    fn get_by_conversation(
        &self,
        conversation_id: &str,
        limit: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<Exchange>, StorageError>> + Send;

    /// All exchanges in one thread, sorted by timestamp ascending.
    ///
    /// When `user_id` is given, only that owner's exchanges are returned.
    fn get_thread(
        &self,
        thread_id: &str,
        user_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<Exchange>, StorageError>> + Send;

    /// The `limit` most-recently-active threads for a user and site.
    ///
    /// Threads are ordered most recent first; exchanges within each thread
    /// are sorted by timestamp ascending. See
    /// [`crate::threading::group_into_threads`] for the tie-break rules.
    fn get_recent_threads(
        &self,
        user_id: &str,
        site: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Thread>, StorageError>> + Send;

    /// Delete the exchange with `conversation_id`.
    ///
    /// Returns `false` (not an error) when the id is unknown or when
    /// `user_id` is supplied and does not match the owner.
    fn delete(
        &self,
        conversation_id: &str,
        user_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<bool, StorageError>> + Send;

    /// Search exchanges, backend-defined relevance ordering.
    ///
    /// `user_id` and `site` scope the result set when present.
    fn search(
        &self,
        query: &str,
        user_id: Option<&str>,
        site: Option<&str>,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Exchange>, StorageError>> + Send;
}
