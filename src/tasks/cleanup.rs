//! Expiry Sweep Task
//!
//! Background task that periodically purges expired cache entries. Caches
//! expire lazily by default; this task is only running when a caller spawns
//! it.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Backend, Cache};

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs until aborted, sleeping for `interval` between sweeps.
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort the sweep.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::<String, String>::with_config(config));
/// let sweep = spawn_purge_task(cache.clone(), Duration::from_secs(30));
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_purge_task<K, V, B>(cache: Arc<Cache<K, V, B>>, interval: Duration) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: Backend<K, V> + 'static,
{
    tokio::spawn(async move {
        info!(?interval, "starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!(removed, "expiry sweep: purged expired entries");
            } else {
                debug!("expiry sweep: no expired entries found");
            }
        }
    })
}
