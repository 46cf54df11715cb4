//! BoxEmbedder -- object-safe dynamic dispatch wrapper for Embedder.
//!
//! Same blanket-impl pattern as `BoxStorageProvider`:
//! 1. Define an object-safe `EmbedderDyn` trait with boxed futures
//! 2. Blanket-impl `EmbedderDyn` for all `T: Embedder`
//! 3. `BoxEmbedder` wraps `Box<dyn EmbedderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use colloquy_types::error::StorageError;

use super::embedder::Embedder;

/// Object-safe version of [`Embedder`] with boxed futures.
pub trait EmbedderDyn: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StorageError>> + Send + 'a>>;

    fn dimension_dyn(&self) -> usize;
}

/// Blanket implementation: any `Embedder` automatically implements
/// `EmbedderDyn`.
impl<T: Embedder> EmbedderDyn for T {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StorageError>> + Send + 'a>> {
        Box::pin(self.embed(text))
    }

    fn dimension_dyn(&self) -> usize {
        self.dimension()
    }
}

/// Type-erased embedder handed to storage backends at construction time.
pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn + Send + Sync>,
}

impl BoxEmbedder {
    /// Wrap a concrete `Embedder` in a type-erased box.
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    /// Embed a single text into a vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, StorageError> {
        self.inner.embed_boxed(text).await
    }

    /// The dimensionality of the output vectors.
    pub fn dimension(&self) -> usize {
        self.inner.dimension_dyn()
    }
}
