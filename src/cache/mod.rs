//! Cache Module
//!
//! Provides the generic cache engine with TTL expiration, backend eviction
//! tracking and snapshot persistence.

mod backend;
mod cacheable;
mod entry;
mod lru;
mod stats;
mod store;
mod tracker;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::{Backend, EvictionListener, LruBackend};
pub use cacheable::Cacheable;
pub use entry::Entry;
pub use stats::CacheStats;
pub use store::Cache;
pub use tracker::KeyTracker;
