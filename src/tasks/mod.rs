//! Background Tasks Module
//!
//! Optional background work a caller may attach to a cache.
//!
//! # Tasks
//! - Expiry sweep: purges expired entries at a fixed interval instead of
//!   waiting for them to be read

mod cleanup;

pub use cleanup::spawn_purge_task;
