//! In-memory storage medium.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::persistence::Storage;

// == Memory Storage ==
/// Stores byte blobs in a shared map. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the blob under `identifier`, returning whether one existed.
    pub async fn remove(&self, identifier: &str) -> bool {
        self.blobs.write().await.remove(identifier).is_some()
    }

    /// Returns the number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn store(&self, bytes: Vec<u8>, identifier: &str) -> Result<(), StorageError> {
        self.blobs.write().await.insert(identifier.to_string(), bytes);
        Ok(())
    }

    async fn load(&self, identifier: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blobs.read().await.get(identifier).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_load() {
        let storage = MemoryStorage::new();

        storage.store(b"payload".to_vec(), "MEM").await.unwrap();

        assert_eq!(storage.load("MEM").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites_and_clones_share() {
        let storage = MemoryStorage::new();
        let shared = storage.clone();

        storage.store(b"one".to_vec(), "id").await.unwrap();
        shared.store(b"two".to_vec(), "id").await.unwrap();

        assert_eq!(storage.load("id").await.unwrap(), Some(b"two".to_vec()));
        assert!(storage.remove("id").await);
        assert!(shared.is_empty().await);
    }
}
