//! Cacheable Trait
//!
//! The core cache surface as a trait, so callers can hold any cache
//! implementation behind one interface.

use std::hash::Hash;

use async_trait::async_trait;

use crate::cache::{Backend, Cache};

#[async_trait]
pub trait Cacheable: Send + Sync {
    type Key: Send + Sync;
    type Value: Send;

    /// Stores `value` under `key`.
    async fn insert(&self, value: Self::Value, key: Self::Key);

    /// Returns the live value under `key`, if any.
    async fn value(&self, key: &Self::Key) -> Option<Self::Value>;

    /// Removes the value under `key`.
    async fn remove_value(&self, key: &Self::Key);
}

#[async_trait]
impl<K, V, B> Cacheable for Cache<K, V, B>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: Backend<K, V>,
{
    type Key = K;
    type Value = V;

    async fn insert(&self, value: V, key: K) {
        Cache::insert(self, value, key).await
    }

    async fn value(&self, key: &K) -> Option<V> {
        Cache::value(self, key).await
    }

    async fn remove_value(&self, key: &K) {
        Cache::remove_value(self, key).await
    }
}
