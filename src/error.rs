//! Error types for the cache
//!
//! Provides unified error handling using thiserror. In-memory cache
//! operations never fail; only persistence surfaces these errors.

use thiserror::Error;

// == Storage Error Enum ==
/// Failure reported by a persistence medium.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The identifier cannot be mapped to a location in this medium
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

// == Cache Error Enum ==
/// Unified error type for cache persistence.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The persistence medium failed to store or load
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Entries could not be serialized
    #[error("Encode failure: {0}")]
    Encode(#[source] serde_json::Error),

    /// Persisted bytes are malformed or do not match the entry schema
    #[error("Decode failure: {0}")]
    Decode(#[source] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
