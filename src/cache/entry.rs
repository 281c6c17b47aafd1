//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A stored key, its value and an optional absolute expiration instant.
///
/// Identity is the key alone: two entries with the same key compare equal
/// and hash alike regardless of value or expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry<K, V> {
    /// The key this entry is stored under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an entry expiring at an absolute instant.
    pub fn new(key: K, value: V, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    /// Creates an entry stamped at `now` with an optional lifetime.
    ///
    /// A lifetime that would overflow the representable range is treated as
    /// no expiration.
    pub fn with_lifetime(key: K, value: V, now: DateTime<Utc>, lifetime: Option<Duration>) -> Self {
        let expires_at = lifetime.and_then(|lifetime| now.checked_add_signed(lifetime));
        Self::new(key, value, expires_at)
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its
    /// expiration instant, so a zero lifetime expires immediately.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, or None if no expiration is set.
    ///
    /// Expired entries report a zero duration.
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|expires| {
            if expires > now {
                expires - now
            } else {
                Duration::zero()
            }
        })
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = Entry::with_lifetime("k", "test_value", t0(), None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(t0() + Duration::days(10_000)));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = Entry::with_lifetime("k", "test_value", t0(), Some(Duration::seconds(60)));

        assert_eq!(entry.expires_at, Some(t0() + Duration::seconds(60)));
        assert!(!entry.is_expired_at(t0()));
        assert!(!entry.is_expired_at(t0() + Duration::seconds(59)));
        assert!(entry.is_expired_at(t0() + Duration::seconds(61)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry::new("k", "v", Some(t0()));

        assert!(entry.is_expired_at(t0()), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(t0() - Duration::milliseconds(1)));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::with_lifetime("k", "v", t0(), Some(Duration::seconds(10)));

        assert_eq!(
            entry.ttl_remaining_at(t0() + Duration::seconds(4)),
            Some(Duration::seconds(6))
        );
        assert_eq!(
            entry.ttl_remaining_at(t0() + Duration::seconds(15)),
            Some(Duration::zero())
        );
        assert!(Entry::new("k", "v", None).ttl_remaining_at(t0()).is_none());
    }

    #[test]
    fn test_overflowing_lifetime_never_expires() {
        let entry = Entry::with_lifetime("k", "v", t0(), Some(Duration::MAX));
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_identity_is_key_only() {
        let a = Entry::new("same", 1, None);
        let b = Entry::new("same", 2, Some(t0()));
        let c = Entry::new("other", 1, None);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_entry_serde_preserves_expiration() {
        let expires = t0() + Duration::milliseconds(1_234);
        let entry = Entry::new("key".to_string(), vec![1u8, 2, 3], Some(expires));

        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry<String, Vec<u8>> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.key, "key");
        assert_eq!(back.value, vec![1, 2, 3]);
        assert_eq!(back.expires_at, Some(expires));
    }
}
