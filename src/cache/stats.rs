//! Cache Statistics Module
//!
//! Counters describing how a cache has been used: lookups that found a live
//! value, lookups that did not, entries dropped for age and entries the
//! backend dropped on its own.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time usage counters, returned by
/// [`Cache::stats`](crate::cache::Cache::stats).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered with a value
    pub hits: u64,
    /// Lookups answered with nothing, expired entries included
    pub misses: u64,
    /// Entries purged because their lifetime elapsed
    pub expirations: u64,
    /// Entries the backend dropped without being asked
    pub evictions: u64,
    /// Keys tracked when the counters were read
    pub total_entries: usize,
}

impl CacheStats {
    /// Starts every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lookups, hit or miss.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    // == Hit Rate ==
    /// Fraction of lookups that found a value, in `0.0..=1.0`.
    ///
    /// A cache that was never read reports 0.0.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
