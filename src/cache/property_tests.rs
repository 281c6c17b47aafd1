//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a plain HashMap model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use chrono::{Duration, TimeZone, Utc};

use crate::cache::{Cache, Entry};
use crate::clock::ManualClock;
use crate::config::CacheConfig;
use crate::persistence::{codec, MemoryStorage, Storage};

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e][0-9]{0,1}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

/// A cache operation for sequence testing
#[derive(Debug, Clone)]
enum CacheOp {
    Insert { key: String, value: String },
    Value { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Insert { key, value }),
        key_strategy().prop_map(|key| CacheOp::Value { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

fn manual_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

fn clocked_config(clock: &ManualClock) -> CacheConfig {
    let source = clock.clone();
    CacheConfig::new().with_time_source(move || source.now())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a pair and reading it back returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        tokio_test::block_on(async {
            let cache = Cache::new();

            cache.insert(value.clone(), key.clone()).await;

            prop_assert_eq!(cache.value(&key).await, Some(value));
            Ok(())
        })?;
    }

    // After removal a key is not found, whatever happened before.
    #[test]
    fn prop_remove_clears_key(
        ops in prop::collection::vec(cache_op_strategy(), 0..30),
        key in key_strategy()
    ) {
        tokio_test::block_on(async {
            let cache = Cache::new();
            for op in ops {
                match op {
                    CacheOp::Insert { key, value } => cache.insert(value, key).await,
                    CacheOp::Value { key } => { cache.value(&key).await; }
                    CacheOp::Remove { key } => cache.remove_value(&key).await,
                }
            }

            cache.remove_value(&key).await;
            cache.remove_value(&key).await;

            prop_assert!(cache.value(&key).await.is_none());
            prop_assert!(!cache.contains_key(&key));
            Ok(())
        })?;
    }

    // Any sequence of operations leaves the cache agreeing with a HashMap.
    #[test]
    fn prop_matches_hashmap_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        tokio_test::block_on(async {
            let cache = Cache::new();
            let mut model: HashMap<String, String> = HashMap::new();
            let mut expected_hits = 0;
            let mut expected_misses = 0;

            for op in ops {
                match op {
                    CacheOp::Insert { key, value } => {
                        cache.insert(value.clone(), key.clone()).await;
                        model.insert(key, value);
                    }
                    CacheOp::Value { key } => {
                        let found = cache.value(&key).await;
                        prop_assert_eq!(found.as_ref(), model.get(&key));
                        if found.is_some() { expected_hits += 1 } else { expected_misses += 1 }
                    }
                    CacheOp::Remove { key } => {
                        cache.remove_value(&key).await;
                        model.remove(&key);
                    }
                }
            }

            prop_assert_eq!(cache.len(), model.len());
            let stats = cache.stats().await;
            prop_assert_eq!(stats.hits, expected_hits);
            prop_assert_eq!(stats.misses, expected_misses);
            Ok(())
        })?;
    }

    // A bounded backend never holds more than its capacity, and the tracked
    // keys stay exactly the keys the backend still answers for.
    #[test]
    fn prop_tracker_follows_backend_evictions(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..80),
        capacity in 1usize..8
    ) {
        tokio_test::block_on(async {
            let cache = Cache::with_config(CacheConfig::new().with_capacity(capacity));
            let mut inserted = HashSet::new();

            for (key, value) in entries {
                cache.insert(value, key.clone()).await;
                inserted.insert(key);
                prop_assert!(cache.len() <= capacity);
            }

            for key in &inserted {
                let tracked = cache.contains_key(key);
                let present = cache.value(key).await.is_some();
                prop_assert_eq!(tracked, present, "tracker out of sync for {}", key);
            }
            Ok(())
        })?;
    }

    // A save never contains a key the backend has already evicted.
    #[test]
    fn prop_save_excludes_evicted_keys(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..40),
        capacity in 1usize..5
    ) {
        tokio_test::block_on(async {
            let cache = Cache::with_config(CacheConfig::new().with_capacity(capacity));
            let storage = MemoryStorage::new();
            let mut last = HashMap::new();

            for (key, value) in entries {
                cache.insert(value.clone(), key.clone()).await;
                last.insert(key, value);
            }

            cache.save_to_disk("snapshot", &storage).await.unwrap();
            let bytes = storage.load("snapshot").await.unwrap().unwrap();
            let saved: Vec<Entry<String, String>> = codec::decode(&bytes).unwrap();

            prop_assert!(saved.len() <= capacity);
            for entry in saved {
                prop_assert!(cache.contains_key(&entry.key));
                prop_assert_eq!(Some(&entry.value), last.get(&entry.key));
            }
            Ok(())
        })?;
    }

    // Entries written and restored come back with the same values.
    #[test]
    fn prop_save_restore_roundtrip(
        entries in prop::collection::hash_map(key_strategy(), value_strategy(), 0..20)
    ) {
        tokio_test::block_on(async {
            let cache = Cache::with_config(
                CacheConfig::new().with_entry_lifetime(Duration::hours(1)),
            );
            let storage = MemoryStorage::new();

            for (key, value) in &entries {
                cache.insert(value.clone(), key.clone()).await;
            }
            cache.save_to_disk("snapshot", &storage).await.unwrap();

            let restored = Cache::<String, String>::read_from(&storage, "snapshot")
                .await
                .unwrap()
                .unwrap();

            prop_assert_eq!(restored.len(), entries.len());
            for (key, value) in &entries {
                let found = restored.value(key).await;
                prop_assert_eq!(found.as_ref(), Some(value));
            }
            Ok(())
        })?;
    }

    // With lifetime L an entry is readable just before L and gone just after.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        value in value_strategy(),
        lifetime_ms in 2i64..100_000,
        epsilon_ms in 1i64..1_000
    ) {
        let epsilon_ms = epsilon_ms.min(lifetime_ms - 1);
        tokio_test::block_on(async {
            let clock = manual_clock();
            let cache = Cache::with_config(
                clocked_config(&clock).with_entry_lifetime(Duration::milliseconds(lifetime_ms)),
            );

            cache.insert(value.clone(), key.clone()).await;

            clock.advance(Duration::milliseconds(lifetime_ms - epsilon_ms));
            prop_assert_eq!(cache.value(&key).await, Some(value));

            clock.advance(Duration::milliseconds(2 * epsilon_ms));
            prop_assert!(cache.value(&key).await.is_none());
            prop_assert!(!cache.contains_key(&key), "Expired key should be purged");
            Ok(())
        })?;
    }

    // Without a lifetime nothing ever expires.
    #[test]
    fn prop_no_lifetime_never_expires(
        key in key_strategy(),
        value in value_strategy(),
        elapsed_days in 0i64..1_000_000
    ) {
        tokio_test::block_on(async {
            let clock = manual_clock();
            let cache = Cache::with_config(clocked_config(&clock));

            cache.insert(value.clone(), key.clone()).await;
            clock.advance(Duration::days(elapsed_days));

            prop_assert_eq!(cache.value(&key).await, Some(value));
            Ok(())
        })?;
    }
}
