//! Configuration Module
//!
//! Construction-time parameters for a cache: the time source, the optional
//! entry lifetime, and the capacity of the default backend.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

/// Function returning the current time, consulted on every insert and read.
pub type TimeSource = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Cache configuration parameters.
///
/// Fixed once the cache is constructed. All fields have sensible defaults:
/// wall-clock time, no expiration and an unbounded backend.
#[derive(Clone)]
pub struct CacheConfig {
    /// Source of "now" for expiration stamping and checks
    pub time_source: TimeSource,
    /// Lifetime applied to every inserted entry, None = entries never expire
    pub entry_lifetime: Option<Duration>,
    /// Maximum entries held by the default backend, None = unbounded
    pub capacity: Option<usize>,
}

impl CacheConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime applied to every inserted entry.
    pub fn with_entry_lifetime(mut self, lifetime: Duration) -> Self {
        self.entry_lifetime = Some(lifetime);
        self
    }

    /// Replaces the wall clock with a custom time source.
    pub fn with_time_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.time_source = Arc::new(source);
        self
    }

    /// Bounds the number of entries the default backend keeps.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Returns the current time according to the configured source.
    pub fn now(&self) -> DateTime<Utc> {
        (self.time_source)()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            time_source: Arc::new(Utc::now),
            entry_lifetime: None,
            capacity: None,
        }
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("entry_lifetime", &self.entry_lifetime)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
