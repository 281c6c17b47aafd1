//! Key Tracker Module
//!
//! Mirrors the set of keys the backend currently holds. The cache updates it
//! on insert and removal; the backend's eviction listener discards from it
//! whenever the backend drops an entry on its own.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::cache::Entry;

// == Key Tracker ==
/// Shared, cloneable handle to the tracked key set.
///
/// Each key remembers which stored entry it stands for, so an eviction
/// report for an entry that was already replaced leaves the key tracked.
///
/// The lock is held only for the duration of a single set operation and
/// never across a backend call, so the eviction listener may fire while the
/// cache is in the middle of an operation.
pub struct KeyTracker<K, V> {
    inner: Arc<TrackerInner<K, V>>,
}

struct TrackerInner<K, V> {
    /// Key -> the entry last stored under it
    keys: Mutex<HashMap<K, Weak<Entry<K, V>>>>,
    /// Number of backend-driven evictions observed
    evictions: AtomicU64,
}

impl<K, V> Clone for KeyTracker<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for KeyTracker<K, V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                keys: Mutex::new(HashMap::new()),
                evictions: AtomicU64::new(0),
            }),
        }
    }
}

impl<K, V> std::fmt::Debug for KeyTracker<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyTracker")
            .field("evictions", &self.inner.evictions.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone, V> KeyTracker<K, V> {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&self) -> MutexGuard<'_, HashMap<K, Weak<Entry<K, V>>>> {
        self.inner.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Insert ==
    /// Records `entry` as the one the backend holds under its key.
    ///
    /// # Arguments
    /// * `entry` - The entry about to be handed to the backend
    pub fn insert(&self, entry: &Arc<Entry<K, V>>) {
        self.keys().insert(entry.key.clone(), Arc::downgrade(entry));
    }

    // == Discard ==
    /// Forgets a key. Discarding an absent key is a no-op.
    pub fn discard(&self, key: &K) -> bool {
        self.keys().remove(key).is_some()
    }

    // == Record Eviction ==
    /// Discards the key of an entry the backend evicted on its own.
    ///
    /// Nothing happens unless `entry` is still the entry recorded for its
    /// key; a late report about a replaced entry is ignored.
    pub fn record_eviction(&self, entry: &Arc<Entry<K, V>>) {
        let mut keys = self.keys();
        let current = keys
            .get(&entry.key)
            .is_some_and(|recorded| std::ptr::eq(recorded.as_ptr(), Arc::as_ptr(entry)));

        if current {
            keys.remove(&entry.key);
            self.inner.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    // == Snapshot ==
    /// Returns a copy of the tracked keys, unaffected by later mutation.
    pub fn snapshot(&self) -> HashSet<K> {
        self.keys().keys().cloned().collect()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.keys().contains_key(key)
    }

    // == Clear ==
    /// Forgets every key.
    pub fn clear(&self) {
        self.keys().clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Returns how many backend-driven evictions have been recorded.
    pub fn evictions(&self) -> u64 {
        self.inner.evictions.load(Ordering::Relaxed)
    }
}
