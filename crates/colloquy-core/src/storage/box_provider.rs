//! BoxStorageProvider -- object-safe dynamic dispatch wrapper for
//! StorageProvider.
//!
//! 1. Define an object-safe `StorageProviderDyn` trait with boxed futures
//! 2. Blanket-impl `StorageProviderDyn` for all `T: StorageProvider`
//! 3. `BoxStorageProvider` wraps `Box<dyn StorageProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use colloquy_types::error::StorageError;
use colloquy_types::exchange::{Exchange, ExchangeDraft, Thread};

use super::provider::StorageProvider;

/// Object-safe version of [`StorageProvider`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch
/// (`dyn StorageProviderDyn`). A blanket implementation is provided for all
/// types implementing `StorageProvider`.
pub trait StorageProviderDyn: Send + Sync {
    fn add_boxed(
        &self,
        draft: ExchangeDraft,
    ) -> Pin<Box<dyn Future<Output = Result<Exchange, StorageError>> + Send + '_>>;

    fn get_by_conversation_boxed<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: Option<usize>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>>;

    fn get_thread_boxed<'a>(
        &'a self,
        thread_id: &'a str,
        user_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>>;

    fn get_recent_threads_boxed<'a>(
        &'a self,
        user_id: &'a str,
        site: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Thread>, StorageError>> + Send + 'a>>;

    fn delete_boxed<'a>(
        &'a self,
        conversation_id: &'a str,
        user_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StorageError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
        user_id: Option<&'a str>,
        site: Option<&'a str>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>>;
}

/// Blanket implementation: any `StorageProvider` automatically implements
/// `StorageProviderDyn`.
impl<T: StorageProvider> StorageProviderDyn for T {
    fn add_boxed(
        &self,
        draft: ExchangeDraft,
    ) -> Pin<Box<dyn Future<Output = Result<Exchange, StorageError>> + Send + '_>> {
        Box::pin(self.add(draft))
    }

    fn get_by_conversation_boxed<'a>(
        &'a self,
        conversation_id: &'a str,
        limit: Option<usize>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>> {
        Box::pin(self.get_by_conversation(conversation_id, limit))
    }

    fn get_thread_boxed<'a>(
        &'a self,
        thread_id: &'a str,
        user_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>> {
        Box::pin(self.get_thread(thread_id, user_id))
    }

    fn get_recent_threads_boxed<'a>(
        &'a self,
        user_id: &'a str,
        site: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Thread>, StorageError>> + Send + 'a>> {
        Box::pin(self.get_recent_threads(user_id, site, limit))
    }

    fn delete_boxed<'a>(
        &'a self,
        conversation_id: &'a str,
        user_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<bool, StorageError>> + Send + 'a>> {
        Box::pin(self.delete(conversation_id, user_id))
    }

    fn search_boxed<'a>(
        &'a self,
        query: &'a str,
        user_id: Option<&'a str>,
        site: Option<&'a str>,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Exchange>, StorageError>> + Send + 'a>> {
        Box::pin(self.search(query, user_id, site, limit))
    }
}

/// Type-erased storage provider for runtime backend selection.
///
/// Wraps any `StorageProvider` implementation behind dynamic dispatch so the
/// registry can hand out one shared instance regardless of the configured
/// backend kind. Since `StorageProvider` uses RPITIT, it cannot be used as a
/// trait object directly; `BoxStorageProvider` provides equivalent methods
/// that delegate to the inner `StorageProviderDyn` trait object.
pub struct BoxStorageProvider {
    inner: Box<dyn StorageProviderDyn + Send + Sync>,
}

impl std::fmt::Debug for BoxStorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxStorageProvider").finish_non_exhaustive()
    }
}

impl BoxStorageProvider {
    /// Wrap a concrete `StorageProvider` in a type-erased box.
    pub fn new<T: StorageProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    /// Persist a new exchange. See [`StorageProvider::add`].
    pub async fn add(&self, draft: ExchangeDraft) -> Result<Exchange, StorageError> {
        self.inner.add_boxed(draft).await
    }

    /// All exchanges sharing a conversation id, oldest first.
    pub async fn get_by_conversation(
        &self,
        conversation_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Exchange>, StorageError> {
        self.inner
            .get_by_conversation_boxed(conversation_id, limit)
            .await
    }

    /// All exchanges in one thread, timestamp ascending.
    pub async fn get_thread(
        &self,
        thread_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Exchange>, StorageError> {
        self.inner.get_thread_boxed(thread_id, user_id).await
    }

    /// The most-recently-active threads for a user and site.
    pub async fn get_recent_threads(
        &self,
        user_id: &str,
        site: &str,
        limit: usize,
    ) -> Result<Vec<Thread>, StorageError> {
        self.inner
            .get_recent_threads_boxed(user_id, site, limit)
            .await
    }

    /// Delete one exchange. `false` when absent or owned by someone else.
    pub async fn delete(
        &self,
        conversation_id: &str,
        user_id: Option<&str>,
    ) -> Result<bool, StorageError> {
        self.inner.delete_boxed(conversation_id, user_id).await
    }

    /// Search exchanges with optional user/site scoping.
    pub async fn search(
        &self,
        query: &str,
        user_id: Option<&str>,
        site: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Exchange>, StorageError> {
        self.inner.search_boxed(query, user_id, site, limit).await
    }
}
