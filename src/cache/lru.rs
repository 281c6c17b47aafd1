//! LRU Order Module
//!
//! Implements Least Recently Used ordering for backend eviction.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Order ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a fresh, strictly increasing tick.
/// The smallest tick in `order` is the least recently used key.
#[derive(Debug)]
pub struct LruOrder<K> {
    /// Tick -> key, oldest first
    order: BTreeMap<u64, K>,
    /// Key -> its current tick
    ticks: HashMap<K, u64>,
    next_tick: u64,
}

impl<K> Default for LruOrder<K> {
    fn default() -> Self {
        Self {
            order: BTreeMap::new(),
            ticks: HashMap::new(),
            next_tick: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> LruOrder<K> {
    // == Constructor ==
    /// Creates a new empty LRU order.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, adding it if new.
    pub fn touch(&mut self, key: &K) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.ticks.insert(key.clone(), tick) {
            self.order.remove(&old);
        }
        self.order.insert(tick, key.clone());
    }

    // == Remove ==
    /// Removes a key from the order. Unknown keys are ignored.
    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the order is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
        self.ticks.clear();
    }
}
