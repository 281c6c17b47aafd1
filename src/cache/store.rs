//! Cache Store Module
//!
//! Main cache engine combining a backend with key tracking, lazy TTL
//! expiration and snapshot persistence.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{Backend, CacheStats, Entry, EvictionListener, KeyTracker, LruBackend};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::persistence::{codec, Storage};

/// Mutable state guarded by the cache mutex.
struct State<B> {
    backend: B,
    stats: CacheStats,
}

// == Cache ==
/// Generic time-aware cache.
///
/// Every operation takes the internal mutex for its whole in-memory part, so
/// concurrent callers observe operations as if they ran one after another.
/// Expired entries are purged lazily, when a read or a save runs into them.
///
/// # Example
/// ```
/// # tokio_test::block_on(async {
/// use timed_cache::{Cache, CacheConfig};
///
/// let cache: Cache<String, u32> =
///     Cache::with_config(CacheConfig::new().with_entry_lifetime(chrono::Duration::minutes(5)));
///
/// cache.insert(7, "answer".to_string()).await;
/// assert_eq!(cache.value(&"answer".to_string()).await, Some(7));
/// # });
/// ```
pub struct Cache<K, V, B = LruBackend<K, V>> {
    state: Mutex<State<B>>,
    tracker: KeyTracker<K, V>,
    config: CacheConfig,
    _value: PhantomData<fn() -> V>,
}

impl<K, V> Cache<K, V, LruBackend<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache with default configuration: wall clock, no
    /// expiration, unbounded backend.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache backed by an [`LruBackend`] bounded by
    /// `config.capacity`.
    pub fn with_config(config: CacheConfig) -> Self {
        let backend = match config.capacity {
            Some(capacity) => LruBackend::with_capacity(capacity),
            None => LruBackend::new(),
        };
        Self::with_backend(config, backend)
    }

    // == Read From ==
    /// Restores a cache previously written by [`Cache::save_to_disk`].
    ///
    /// Returns `Ok(None)` when nothing is stored under `identifier`.
    ///
    /// # Arguments
    /// * `storage` - The medium the snapshot was written to
    /// * `identifier` - The name the snapshot was stored under
    pub async fn read_from<S>(storage: &S, identifier: &str) -> Result<Option<Self>>
    where
        S: Storage + ?Sized,
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        Self::read_from_with_config(storage, identifier, CacheConfig::default()).await
    }

    /// Like [`Cache::read_from`], restoring into a cache built from `config`.
    ///
    /// # Arguments
    /// * `storage` - The medium the snapshot was written to
    /// * `identifier` - The name the snapshot was stored under
    /// * `config` - Clock, lifetime and capacity of the restored cache
    pub async fn read_from_with_config<S>(
        storage: &S,
        identifier: &str,
        config: CacheConfig,
    ) -> Result<Option<Self>>
    where
        S: Storage + ?Sized,
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let backend = match config.capacity {
            Some(capacity) => LruBackend::with_capacity(capacity),
            None => LruBackend::new(),
        };
        Self::read_from_with_backend(storage, identifier, config, backend).await
    }
}

impl<K, V> Default for Cache<K, V, LruBackend<K, V>>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B> Cache<K, V, B>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: Backend<K, V>,
{
    /// Creates a cache over a caller-supplied backend.
    ///
    /// The backend is cleared and its eviction listener is replaced with one
    /// that keeps this cache's key tracker in sync.
    ///
    /// # Arguments
    /// * `config` - Clock and entry lifetime
    /// * `backend` - Storage facility the entries live in
    pub fn with_backend(config: CacheConfig, mut backend: B) -> Self {
        let tracker = KeyTracker::new();

        if !backend.is_empty() {
            debug!(dropped = backend.len(), "clearing pre-populated backend");
            backend.clear();
        }

        backend.set_eviction_listener(tracking_listener(tracker.clone()));

        debug!(?config, "cache initialized");

        Self {
            state: Mutex::new(State {
                backend,
                stats: CacheStats::new(),
            }),
            tracker,
            config,
            _value: PhantomData,
        }
    }

    /// Restores a cache over a caller-supplied backend.
    ///
    /// Entries keep the expiration instant they were saved with; entries
    /// that lapsed while persisted are purged on their first read.
    ///
    /// # Arguments
    /// * `storage` - The medium the snapshot was written to
    /// * `identifier` - The name the snapshot was stored under
    /// * `config` - Clock and entry lifetime of the restored cache
    /// * `backend` - Storage facility the restored entries are put into
    pub async fn read_from_with_backend<S>(
        storage: &S,
        identifier: &str,
        config: CacheConfig,
        backend: B,
    ) -> Result<Option<Self>>
    where
        S: Storage + ?Sized,
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let bytes = match storage.load(identifier).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(identifier, "no persisted cache found");
                return Ok(None);
            }
            Err(err) => {
                warn!(identifier, error = %err, "failed to load persisted cache");
                return Err(err.into());
            }
        };

        // Decode everything before building the cache; a bad payload restores nothing
        let entries: Vec<Entry<K, V>> = codec::decode(&bytes).map_err(|err| {
            warn!(identifier, error = %err, "persisted cache is unreadable");
            err
        })?;
        let restored = entries.len();

        let cache = Self::with_backend(config, backend);
        {
            let mut state = cache.state.lock().await;
            for entry in entries {
                cache.store_entry(&mut state, entry);
            }
        }

        info!(identifier, restored, "cache restored");
        Ok(Some(cache))
    }

    // == Insert ==
    /// Stores `value` under `key`, stamping it with the configured lifetime.
    ///
    /// Replaces any existing entry under the same key. The backend may evict
    /// other entries to make room; those are reported to the tracker, not the
    /// caller.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `key` - The key to store it under
    pub async fn insert(&self, value: V, key: K) {
        let entry = Entry::with_lifetime(key, value, self.config.now(), self.config.entry_lifetime);
        let mut state = self.state.lock().await;
        self.store_entry(&mut state, entry);
    }

    // == Value ==
    /// Returns the value under `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect and counted as a miss.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    pub async fn value(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock().await;
        let found = state.backend.get(key);

        // Check if expired
        match self.live(&mut state, found) {
            Some(entry) => {
                state.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                // Missing, evicted or just purged
                state.stats.record_miss();
                None
            }
        }
    }

    // == Remove Value ==
    /// Removes the entry under `key`. Removing an absent key is a no-op.
    ///
    /// # Arguments
    /// * `key` - The key to remove
    pub async fn remove_value(&self, key: &K) {
        let mut state = self.state.lock().await;
        self.purge(&mut state, key);
    }

    // == Save To Disk ==
    /// Writes every entry still valid right now to `storage` under
    /// `identifier`.
    ///
    /// Expired entries met during enumeration are purged and left out. The
    /// lock is released before the medium is written.
    ///
    /// # Arguments
    /// * `identifier` - The name to store the snapshot under
    /// * `storage` - The medium to write to
    pub async fn save_to_disk<S>(&self, identifier: &str, storage: &S) -> Result<()>
    where
        S: Storage + ?Sized,
        K: Serialize,
        V: Serialize,
    {
        let entries = {
            let mut state = self.state.lock().await;
            let keys = self.tracker.snapshot();
            let mut entries = Vec::with_capacity(keys.len());

            for key in keys {
                // Peek so that saving does not refresh recency
                let found = state.backend.peek(&key);
                match self.live(&mut state, found) {
                    Some(entry) => entries.push(entry),
                    None => {
                        // Tracked but gone from the backend: treat as evicted
                        self.tracker.discard(&key);
                    }
                }
            }
            entries
        };

        let now = self.config.now();
        let next_expiry = entries
            .iter()
            .filter_map(|entry| entry.ttl_remaining_at(now))
            .min();

        let bytes = codec::encode(entries.iter().map(Arc::as_ref))?;

        // Write outside the lock
        if let Err(err) = storage.store(bytes, identifier).await {
            warn!(identifier, error = %err, "failed to persist cache");
            return Err(err.into());
        }

        info!(identifier, saved = entries.len(), ?next_expiry, "cache saved");
        Ok(())
    }

    // == Purge Expired ==
    /// Removes every expired entry now instead of waiting for it to be read.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = self.config.now();
        let mut removed = 0;

        for key in self.tracker.snapshot() {
            let expired = state
                .backend
                .peek(&key)
                .is_some_and(|entry| entry.is_expired_at(now));
            if expired {
                self.purge(&mut state, &key);
                state.stats.record_expiration();
                removed += 1;
            }
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Counters other than the entry count are kept.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.backend.clear();
        self.tracker.clear();
        state.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.evictions = self.tracker.evictions();
        stats.set_total_entries(self.tracker.len());
        stats
    }

    /// Checks whether `key` is tracked, without checking expiration.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tracker.contains(key)
    }

    /// Returns the number of tracked entries, expired ones included until
    /// they are purged.
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    /// Returns true if no entry is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Stores an entry as-is, keeping its expiration instant.
    fn store_entry(&self, state: &mut State<B>, entry: Entry<K, V>) {
        let entry = Arc::new(entry);
        let key = entry.key.clone();
        // Tracked before the put: the backend may evict this very entry while
        // storing it, and that eviction must win.
        self.tracker.insert(&entry);
        state.backend.put(key, entry);
        state.stats.set_total_entries(state.backend.len());
    }

    /// Filters out an expired entry, purging it.
    fn live(
        &self,
        state: &mut State<B>,
        found: Option<Arc<Entry<K, V>>>,
    ) -> Option<Arc<Entry<K, V>>> {
        let entry = found?;
        if entry.is_expired_at(self.config.now()) {
            debug!("purging expired entry on access");
            self.purge(state, &entry.key);
            state.stats.record_expiration();
            return None;
        }
        Some(entry)
    }

    fn purge(&self, state: &mut State<B>, key: &K) {
        state.backend.remove(key);
        self.tracker.discard(key);
        state.stats.set_total_entries(state.backend.len());
    }
}

/// Builds the listener that mirrors backend evictions into the tracker.
fn tracking_listener<K, V>(tracker: KeyTracker<K, V>) -> EvictionListener<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    Arc::new(move |entry: Arc<Entry<K, V>>| {
        tracker.record_eviction(&entry);
    })
}

impl<K, V, B> fmt::Debug for Cache<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
