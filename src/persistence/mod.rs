//! Persistence Module
//!
//! Byte-level media a cache can be saved to and restored from, plus the
//! codec turning entries into bytes.
//!
//! # Media
//! - `MemoryStorage` - process-local map, useful for tests
//! - `FileStorage` - one file per identifier under a root directory

use async_trait::async_trait;

use crate::error::StorageError;

pub mod codec;
mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

// == Storage Trait ==
/// A medium that stores opaque bytes under string identifiers.
///
/// `load` distinguishes "nothing stored here" (`Ok(None)`) from a failing
/// medium (`Err`).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes `bytes` under `identifier`, replacing previous contents.
    async fn store(&self, bytes: Vec<u8>, identifier: &str) -> Result<(), StorageError>;

    /// Reads the bytes stored under `identifier`, if any.
    async fn load(&self, identifier: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
