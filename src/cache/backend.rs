//! Backend Module
//!
//! The storage facility behind a cache. A backend stores entries by key and
//! may drop entries on its own (for example under capacity pressure); when
//! it does, it reports the dropped entry through the registered eviction
//! listener. Backends never interpret expiration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::cache::lru::LruOrder;
use crate::cache::Entry;

/// Callback invoked with every entry a backend drops without being asked.
pub type EvictionListener<K, V> = Arc<dyn Fn(Arc<Entry<K, V>>) + Send + Sync>;

// == Backend Trait ==
/// Storage contract consumed by [`Cache`](crate::cache::Cache).
///
/// `get` takes `&mut self` so that recency-based backends can record the
/// access.
pub trait Backend<K, V>: Send {
    /// Stores an entry, replacing any entry under the same key.
    ///
    /// Replacement is not an eviction and must not fire the listener.
    ///
    /// # Arguments
    /// * `key` - The key to store under
    /// * `entry` - The shared entry, passed back to the listener if evicted
    fn put(&mut self, key: K, entry: Arc<Entry<K, V>>);

    /// Looks an entry up by key.
    fn get(&mut self, key: &K) -> Option<Arc<Entry<K, V>>>;

    /// Looks an entry up without counting it as an access.
    fn peek(&self, key: &K) -> Option<Arc<Entry<K, V>>>;

    /// Removes an entry by key, returning it if it was present.
    fn remove(&mut self, key: &K) -> Option<Arc<Entry<K, V>>>;

    /// Drops every entry without notifying the listener.
    fn clear(&mut self);

    /// Returns the number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if no entry is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers the callback fired on autonomous eviction, replacing any
    /// previously registered one.
    ///
    /// The listener must receive the very `Arc` that was stored by `put`.
    /// Backends may call it late or from another thread; the cache ignores
    /// an eviction whose entry has since been replaced under the same key.
    ///
    /// # Arguments
    /// * `listener` - Callback receiving each evicted entry
    fn set_eviction_listener(&mut self, listener: EvictionListener<K, V>);
}

// == LRU Backend ==
/// In-process backend with an optional entry-count bound.
///
/// When a `put` pushes the entry count past the capacity, the least
/// recently used entries are evicted and reported to the listener.
pub struct LruBackend<K, V> {
    /// Key-value storage
    entries: HashMap<K, Arc<Entry<K, V>>>,
    /// LRU access order
    lru: LruOrder<K>,
    /// Maximum number of entries, None = unbounded
    capacity: Option<usize>,
    listener: Option<EvictionListener<K, V>>,
}

impl<K, V> LruBackend<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an unbounded backend.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruOrder::new(),
            capacity: None,
            listener: None,
        }
    }

    /// Creates a backend holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    /// Returns the configured bound, if any.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn evict_over_capacity(&mut self) {
        let Some(capacity) = self.capacity() else {
            return;
        };

        while self.entries.len() > capacity {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                debug!(capacity, "backend evicted least recently used entry");
                if let Some(listener) = &self.listener {
                    listener(entry);
                }
            }
        }
    }
}

impl<K, V> Default for LruBackend<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for LruBackend<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruBackend")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl<K, V> Backend<K, V> for LruBackend<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    fn put(&mut self, key: K, entry: Arc<Entry<K, V>>) {
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        self.evict_over_capacity();
    }

    fn get(&mut self, key: &K) -> Option<Arc<Entry<K, V>>> {
        let entry = self.entries.get(key).cloned()?;
        self.lru.touch(key);
        Some(entry)
    }

    fn peek(&self, key: &K) -> Option<Arc<Entry<K, V>>> {
        self.entries.get(key).cloned()
    }

    fn remove(&mut self, key: &K) -> Option<Arc<Entry<K, V>>> {
        self.lru.remove(key);
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn set_eviction_listener(&mut self, listener: EvictionListener<K, V>) {
        self.listener = Some(listener);
    }
}
