//! Manual Clock Module
//!
//! A controllable time source for deterministic expiration tests.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::config::TimeSource;

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same underlying instant, so a clone handed to a cache
/// through [`ManualClock::time_source`] observes every `advance` and `set`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Returns the current instant.
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Jumps the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }

    /// Returns a time source reading this clock.
    pub fn time_source(&self) -> TimeSource {
        let clock = self.clone();
        Arc::new(move || clock.now())
    }
}
