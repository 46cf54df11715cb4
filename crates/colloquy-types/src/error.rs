//! Storage error taxonomy.
//!
//! Not-found is never an error here: lookups return empty collections and
//! `delete` returns `false`. The variants below cover the failures that do
//! surface or get logged.

use thiserror::Error;

/// Errors produced by conversation-storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Unknown backend kind with strict resolution enabled, or an otherwise
    /// unusable configuration. Non-strict resolution recovers via fallback
    /// and never raises this.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The resolved backend could not be constructed or initialized. Never
    /// cached: the next registry access retries construction.
    #[error("backend initialization failed: {0}")]
    Initialization(String),

    /// A durable write failed. The reference store logs and swallows this,
    /// trading durability for availability; external backends may surface it.
    #[error("durable write failed: {0}")]
    Persistence(String),

    /// A required field was missing or empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// A backend-defined query failure (connection dropped, malformed
    /// response, and so on).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// True when retrying the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::Initialization(_) | StorageError::Persistence(_) | StorageError::Backend(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Validation("prompt must not be empty".to_string());
        assert_eq!(err.to_string(), "validation error: prompt must not be empty");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(StorageError::Initialization("unreachable".into()).is_retryable());
        assert!(StorageError::Persistence("disk full".into()).is_retryable());
        assert!(!StorageError::Validation("empty".into()).is_retryable());
        assert!(!StorageError::Configuration("bad kind".into()).is_retryable());
    }
}
