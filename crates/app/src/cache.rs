use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Read-through storage for query results, shared across sessions.
pub trait Cache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn insert(&self, key: K, value: V);
}

/// Keeps each entry for a fixed time after insertion. Entries are never
/// invalidated early. Expired entries are dropped on lookup and swept from
/// the whole map on every insert.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, (Instant, V)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K, V> Cache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries();
        let fresh = entries
            .get(key)
            .map(|(stored_at, _)| stored_at.elapsed() < self.ttl)?;
        if fresh {
            entries.get(key).map(|(_, value)| value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    fn insert(&self, key: K, value: V) {
        let mut entries = self.entries();
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }
}

/// Caching disabled: every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<K, V> Cache<K, V> for NoCache {
    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn insert(&self, _key: K, _value: V) {}
}

/// A TTL cache, or [`NoCache`] when `ttl` is zero.
pub fn cache_for<K, V>(ttl: Duration) -> Arc<dyn Cache<K, V>>
where
    K: Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    if ttl.is_zero() {
        Arc::new(NoCache)
    } else {
        Arc::new(TtlCache::new(ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_cache_returns_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), None);
    }

    #[test]
    fn ttl_cache_expires_entries() {
        let cache = TtlCache::new(Duration::from_millis(1));
        cache.insert("a", 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.entries().is_empty());
    }

    #[test]
    fn insert_sweeps_entries_never_read_again() {
        let cache = TtlCache::new(Duration::from_millis(50));
        for key in 0..100 {
            cache.insert(key, key);
        }
        std::thread::sleep(Duration::from_millis(80));
        cache.insert(1000, 1000);
        assert_eq!(cache.get(&1000), Some(1000));
        assert_eq!(cache.entries().len(), 1);
    }

    #[test]
    fn insert_keeps_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.entries().len(), 2);
        assert_eq!(cache.get(&"a"), Some(1));
    }

    #[test]
    fn insert_replaces_existing_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("a", 2);
        assert_eq!(cache.get(&"a"), Some(2));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache: Arc<dyn Cache<&str, i32>> = cache_for(Duration::ZERO);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), None);
    }
}
