//! Persistence Codec
//!
//! Entries are written as a JSON array of
//! `{"key": .., "value": .., "expires_at": <RFC 3339 or null>}` objects.
//! Expiration is stored as an absolute instant, so a restored entry expires
//! at the same moment it would have had it never left memory.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Entry;
use crate::error::{CacheError, Result};

/// Serializes entries into the persisted byte format.
pub fn encode<'a, K, V, I>(entries: I) -> Result<Vec<u8>>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
    I: IntoIterator<Item = &'a Entry<K, V>>,
{
    let entries: Vec<&Entry<K, V>> = entries.into_iter().collect();
    serde_json::to_vec(&entries).map_err(CacheError::Encode)
}

/// Parses entries from the persisted byte format.
///
/// Fails on malformed input or on entries that do not match `K`/`V`; no
/// partial result is returned.
pub fn decode<K, V>(bytes: &[u8]) -> Result<Vec<Entry<K, V>>>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(CacheError::Decode)
}
