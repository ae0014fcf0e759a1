//! Keyed cache whose entries go stale after a fixed lifetime.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stored_at: Instant,
}

impl<V> Slot<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.stored_at) < ttl
    }
}

/// Thread-safe cache with a single time-to-live for every entry.
///
/// Clones share storage. Stale entries are never returned; they are dropped
/// lazily by [`purge_expired`](Self::purge_expired) or on overwrite. Wrap
/// large values in `Arc` so reads stay cheap.
#[derive(Clone)]
pub struct TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    slots: Arc<RwLock<HashMap<K, Slot<V>>>>,
    ttl: Duration,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn with_ttl_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }

    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(
                key,
                Slot {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// The value for `key` if it is still fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_with_age(key).map(|(value, _)| value)
    }

    /// The value for `key` with how long ago it was stored, if still fresh.
    pub fn get_with_age(&self, key: &K) -> Option<(V, Duration)> {
        let now = Instant::now();
        let slots = self.slots.read().ok()?;
        slots
            .get(key)
            .filter(|slot| slot.is_fresh(self.ttl, now))
            .map(|slot| (slot.value.clone(), now.duration_since(slot.stored_at)))
    }

    pub fn invalidate(&self, key: &K) {
        if let Ok(mut slots) = self.slots.write() {
            slots.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.write() {
            slots.clear();
        }
    }

    /// Drop stale entries.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let ttl = self.ttl;
        if let Ok(mut slots) = self.slots.write() {
            slots.retain(|_, slot| slot.is_fresh(ttl, now));
        }
    }

    /// Stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> std::fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_entry_is_returned() {
        let cache = TimedCache::with_ttl_minutes(15);
        cache.insert("market", 42);
        assert_eq!(cache.get(&"market"), Some(42));
        assert_eq!(cache.get(&"other"), None);

        let (value, age) = cache.get_with_age(&"market").unwrap();
        assert_eq!(value, 42);
        assert!(age < Duration::from_secs(60));
    }

    #[test]
    fn test_stale_entry_is_hidden_then_purged() {
        let cache = TimedCache::new(Duration::from_millis(20));
        cache.insert(1, "snapshot".to_string());
        thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 1);

        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = TimedCache::with_ttl_minutes(1);
        let other = cache.clone();
        other.insert("k", 1);
        assert_eq!(cache.get(&"k"), Some(1));

        cache.invalidate(&"k");
        assert_eq!(other.get(&"k"), None);

        other.insert("a", 2);
        other.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_never_serves() {
        let cache = TimedCache::new(Duration::ZERO);
        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), None);
    }
}
