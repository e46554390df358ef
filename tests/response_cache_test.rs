//! Tests for [`ResponseCache`] — LRU order, TTL expiry, and stats.

use std::time::Duration;

use verdandi::{CacheConfig, ResponseCache};

fn cache(max_entries: usize, ttl: Duration) -> ResponseCache<String> {
    ResponseCache::new(&CacheConfig::new().max_entries(max_entries).ttl(ttl))
}

#[test]
fn round_trip_within_ttl() {
    let cache = cache(10, Duration::from_secs(3600));
    cache.set("prompt", "realistic/0", "payload".to_string());
    assert_eq!(
        cache.get("prompt", "realistic/0"),
        Some("payload".to_string())
    );
}

#[test]
fn different_keys_miss() {
    let cache = cache(10, Duration::from_secs(3600));
    cache.set("prompt-1", "mode-1", "v".to_string());

    assert_eq!(cache.get("prompt-2", "mode-1"), None);
    assert_eq!(cache.get("prompt-1", "mode-2"), None);
}

#[test]
fn overflow_evicts_exactly_the_least_recently_used() {
    let cache = cache(2, Duration::from_secs(3600));
    cache.set("p1", "m", "1".to_string());
    cache.set("p2", "m", "2".to_string());
    cache.set("p3", "m", "3".to_string());

    assert_eq!(cache.get("p1", "m"), None);
    assert_eq!(cache.get("p2", "m"), Some("2".to_string()));
    assert_eq!(cache.get("p3", "m"), Some("3".to_string()));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn a_read_protects_an_entry_from_the_next_eviction() {
    let cache = cache(2, Duration::from_secs(3600));
    cache.set("a", "m", "a".to_string());
    cache.set("b", "m", "b".to_string());

    // Touch "a" so "b" becomes the LRU entry
    assert!(cache.get("a", "m").is_some());
    cache.set("c", "m", "c".to_string());

    assert_eq!(cache.get("a", "m"), Some("a".to_string()));
    assert_eq!(cache.get("b", "m"), None);
    assert_eq!(cache.get("c", "m"), Some("c".to_string()));
}

#[test]
fn refreshing_an_existing_key_is_not_an_eviction() {
    let cache = cache(2, Duration::from_secs(3600));
    cache.set("p1", "m", "old".to_string());
    cache.set("p2", "m", "2".to_string());
    cache.set("p1", "m", "new".to_string());

    assert_eq!(cache.get("p1", "m"), Some("new".to_string()));
    assert_eq!(cache.get("p2", "m"), Some("2".to_string()));
    assert_eq!(cache.stats().evictions, 0);
}

#[test]
fn expired_entries_are_removed_on_read() {
    let cache = cache(10, Duration::ZERO);
    cache.set("p", "m", "v".to_string());
    assert_eq!(cache.stats().size, 1);

    std::thread::sleep(Duration::from_millis(5));

    assert_eq!(cache.get("p", "m"), None);
    let stats = cache.stats();
    assert_eq!(stats.size, 0, "expired entry should be dropped");
    assert_eq!(stats.misses, 1);
}

#[test]
fn clear_drops_entries_but_keeps_counters() {
    let cache = cache(10, Duration::from_secs(3600));
    cache.set("p", "m", "v".to_string());
    assert!(cache.get("p", "m").is_some());
    assert!(cache.get("absent", "m").is_none());

    cache.clear();

    let stats = cache.stats();
    assert_eq!(stats.size, 0);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    // Cleared entries are gone, and looking for them counts a fresh miss
    assert_eq!(cache.get("p", "m"), None);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn stats_report_hit_rate() {
    let cache = cache(10, Duration::from_secs(3600));
    cache.set("p", "m", "v".to_string());
    assert!(cache.get("p", "m").is_some());
    assert!(cache.get("q", "m").is_none());

    let stats = cache.stats();
    assert_eq!(stats.max_entries, 10);
    assert!((stats.hit_rate - 50.0).abs() < 1e-9);
    assert_eq!(stats.hit_rate_display(), "50.0%");
    assert_eq!(stats.ttl_minutes(), 60.0);
}

#[test]
fn empty_cache_has_zero_hit_rate() {
    let cache = cache(10, Duration::from_secs(60));
    let stats = cache.stats();
    assert_eq!(stats.hit_rate, 0.0);
    assert_eq!(stats.hits, 0);
}

#[test]
fn thread_safety() {
    use std::sync::Arc;
    use std::thread;

    let cache = Arc::new(cache(64, Duration::from_secs(3600)));
    let mut handles = Vec::new();

    for i in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for j in 0..50 {
                let prompt = format!("prompt-{i}-{j}");
                cache.set(&prompt, "m", format!("{i}-{j}"));
                // May or may not still be resident — must not panic
                let _ = cache.get(&prompt, "m");
            }
        }));
    }

    for h in handles {
        h.join().expect("thread panicked");
    }

    let stats = cache.stats();
    assert!(stats.size <= 64);
}
