//! Cache storage implementations.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use metrics::counter;

use super::config::CacheConfig;
use super::lock::mutex_lock;

const SOURCE: &str = "cache::store";

pub const METRIC_CACHE_HIT_TOTAL: &str = "onair_cache_hit_total";
pub const METRIC_CACHE_MISS_TOTAL: &str = "onair_cache_miss_total";
pub const METRIC_CACHE_EVICT_TOTAL: &str = "onair_cache_evict_total";

/// Process-local key/value cache.
///
/// `ttl = None` keeps an entry until it is removed or evicted.
pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V, ttl: Option<Duration>);
    fn remove(&self, key: &str);
}

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-memory LRU cache with optional per-entry expiry, checked lazily on read.
pub struct MemoryCache<V> {
    entries: Mutex<LruCache<String, Entry<V>>>,
}

impl<V> MemoryCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.capacity_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(Instant::now()) => {
                counter!(METRIC_CACHE_HIT_TOTAL).increment(1);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
        }
        counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
        None
    }

    fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        let entry = Entry { value, expires_at };

        let displaced = mutex_lock(&self.entries, SOURCE, "set").push(key.to_string(), entry);
        if displaced.is_some_and(|(displaced_key, _)| displaced_key != key) {
            counter!(METRIC_CACHE_EVICT_TOTAL).increment(1);
        }
    }

    fn remove(&self, key: &str) {
        mutex_lock(&self.entries, SOURCE, "remove").pop(key);
    }
}

/// Cache that never retains anything; used when caching is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl<V> Cache<V> for NoopCache {
    fn get(&self, _key: &str) -> Option<V> {
        counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
        None
    }

    fn set(&self, _key: &str, _value: V, _ttl: Option<Duration>) {}

    fn remove(&self, _key: &str) {}
}
