//! LRU + TTL cache for parsed provider responses.
//!
//! [`ResponseCache`] sits in front of the rate limiter and the provider
//! fallback chain: a hit short-circuits both. Entries are keyed on a
//! content fingerprint of (prompt, namespace) so identical requests collide
//! intentionally, expire `ttl` after insertion (checked lazily on read),
//! and are evicted strictly least-recently-used when the cache is full —
//! a read or a write both promote the touched key to most-recently-used.
//!
//! Cache operations never fail; a miss is a normal outcome. Hit/miss/
//! eviction metrics are emitted alongside the cumulative counters exposed
//! through [`ResponseCache::stats`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;

use crate::telemetry;

/// Configuration for the response cache.
///
/// Pass to [`VerdandiBuilder::cache()`](crate::VerdandiBuilder::cache) to
/// size the cache the engine wraps around provider calls.
///
/// ```rust
/// # use verdandi::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of live entries. Default: 100.
    pub max_entries: usize,
    /// Time-to-live for cached entries. Default: 15 minutes.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of live entries (minimum 1).
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Cumulative cache statistics.
///
/// `clear()` drops entries but leaves the counters running, so hit rates
/// stay meaningful across cache resets.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Live entries right now.
    pub size: usize,
    /// Configured capacity.
    pub max_entries: usize,
    /// Total fresh lookups served.
    pub hits: u64,
    /// Total lookups that found nothing usable (absent or expired).
    pub misses: u64,
    /// Total entries evicted under capacity pressure (TTL expiry is not
    /// counted here).
    pub evictions: u64,
    /// Hit rate as a percentage of all lookups (0.0 with no traffic).
    pub hit_rate: f64,
    /// Configured time-to-live.
    pub ttl: Duration,
}

impl CacheStats {
    /// Hit rate formatted the way the stats panel shows it, e.g. `"57.1%"`.
    pub fn hit_rate_display(&self) -> String {
        format!("{:.1}%", self.hit_rate)
    }

    /// Time-to-live in minutes.
    pub fn ttl_minutes(&self) -> f64 {
        self.ttl.as_secs_f64() / 60.0
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Counters {
    hits: u64,
    misses: u64,
    evictions: u64,
}

struct Inner<V> {
    entries: LruCache<u64, Entry<V>>,
    counters: Counters,
}

enum Lookup<V> {
    Fresh(V),
    Expired,
    Absent,
}

/// In-memory LRU + TTL cache keyed on a (prompt, namespace) fingerprint.
///
/// The entry table and the recency order live under one mutex, so
/// get-then-promote and set-then-evict are each a single atomic unit with
/// respect to concurrent callers. State is process-scoped and never
/// persisted.
pub struct ResponseCache<V> {
    max_entries: usize,
    ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new response cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_entries: capacity.get(),
            ttl: config.ttl,
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                counters: Counters {
                    hits: 0,
                    misses: 0,
                    evictions: 0,
                },
            }),
        }
    }

    /// Look up a cached value.
    ///
    /// Returns `None` on a miss. An entry older than the TTL is removed and
    /// reported as a miss; a fresh entry is promoted to most-recently-used.
    pub fn get(&self, prompt: &str, namespace: &str) -> Option<V> {
        let key = fingerprint(prompt, namespace);
        let mut inner = self.lock();

        let lookup = match inner.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() > self.ttl => Lookup::Expired,
            Some(entry) => Lookup::Fresh(entry.value.clone()),
            None => Lookup::Absent,
        };

        match lookup {
            Lookup::Fresh(value) => {
                inner.counters.hits += 1;
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(value)
            }
            Lookup::Expired => {
                inner.entries.pop(&key);
                inner.counters.misses += 1;
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            Lookup::Absent => {
                inner.counters.misses += 1;
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert or replace a cached value, promoting it to most-recently-used.
    ///
    /// When the cache is full and the key is new, the single
    /// least-recently-used entry is evicted first and counted.
    pub fn set(&self, prompt: &str, namespace: &str, value: V) {
        let key = fingerprint(prompt, namespace);
        let mut inner = self.lock();

        let displaced = inner.entries.push(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
        // push() hands back either the old value for this key (a refresh,
        // not an eviction) or the LRU entry it pushed out to make room.
        if let Some((displaced_key, _)) = displaced {
            if displaced_key != key {
                inner.counters.evictions += 1;
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
            }
        }
    }

    /// Drop all entries and the recency order.
    ///
    /// Cumulative hit/miss/eviction counters are not reset.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let counters = &inner.counters;
        let lookups = counters.hits + counters.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            counters.hits as f64 / lookups as f64 * 100.0
        };

        CacheStats {
            size: inner.entries.len(),
            max_entries: self.max_entries,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            hit_rate,
            ttl: self.ttl,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compute a cache key from the prompt and its logical namespace.
///
/// Uses `DefaultHasher` (SipHash) over the semantic inputs only — no
/// timestamps, no random salt — so identical requests always land on the
/// same key within a process lifetime.
fn fingerprint(prompt: &str, namespace: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    namespace.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_deterministic() {
        let k1 = fingerprint("what if I moved", "realistic/0");
        let k2 = fingerprint("what if I moved", "realistic/0");
        assert_eq!(k1, k2);
    }

    #[test]
    fn fingerprint_differs_on_prompt() {
        let k1 = fingerprint("what if I moved", "realistic/0");
        let k2 = fingerprint("what if I stayed", "realistic/0");
        assert_ne!(k1, k2);
    }

    #[test]
    fn fingerprint_differs_on_namespace() {
        let k1 = fingerprint("what if I moved", "realistic/0");
        let k2 = fingerprint("what if I moved", "realistic/1");
        assert_ne!(k1, k2);
    }

    #[test]
    fn fingerprint_fields_do_not_bleed() {
        // ("ab", "c") and ("a", "bc") must not collide by construction
        let k1 = fingerprint("ab", "c");
        let k2 = fingerprint("a", "bc");
        assert_ne!(k1, k2);
    }

    #[test]
    fn zero_max_entries_is_clamped_to_one() {
        let cache: ResponseCache<String> = ResponseCache::new(&CacheConfig::new().max_entries(0));
        cache.set("p", "ns", "v".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().max_entries, 1);
    }
}
