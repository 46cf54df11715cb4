//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (remote embedding APIs, local models) live outside this
//! workspace; the reference store only consumes the trait.

use colloquy_types::error::StorageError;

/// Converts one text into an embedding vector.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed a single text into a vector of `dimension()` floats.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, StorageError>> + Send;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
