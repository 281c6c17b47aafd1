//! Timed Cache - A generic in-process cache with TTL expiration
//!
//! Values live under hashable keys with an optional lifetime, an
//! authoritative key set kept in sync with the storage backend's own
//! evictions, and save/restore of the still-valid entries to a byte medium.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod persistence;
pub mod tasks;

pub use cache::{Backend, Cache, CacheStats, Cacheable, Entry, LruBackend};
pub use clock::ManualClock;
pub use config::{CacheConfig, TimeSource};
pub use error::{CacheError, Result, StorageError};
pub use persistence::{FileStorage, MemoryStorage, Storage};
pub use tasks::spawn_purge_task;
