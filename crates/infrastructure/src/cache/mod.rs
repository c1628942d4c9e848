//! Bounded LRU answer cache with lazy TTL expiry.

use hopdns_application::ports::{CacheStats, ResolutionCachePort};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

struct CacheEntry {
    address: Arc<str>,
    inserted_at: Instant,
}

/// Domain -> address map bounded by `capacity` and aged out after `ttl`.
///
/// Expiry is lazy (checked on `get`), eviction happens on `put` when a new
/// key would exceed capacity. Both reads and writes refresh recency, so the
/// recency order is total. One coarse mutex guards the map; hit/miss
/// counters are atomics so `stats` never takes the lock path on hot reads.
pub struct ResolutionCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let bounded = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        info!(
            capacity = bounded.get(),
            ttl_secs = ttl.as_secs(),
            "initializing resolution cache"
        );
        Self {
            entries: Mutex::new(LruCache::new(bounded)),
            capacity: bounded.get(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_at(&self, domain: &str, now: Instant) -> Option<Arc<str>> {
        let mut entries = self.lock();
        match entries.get(domain) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                let address = entry.address.clone();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(address)
            }
            Some(_) => {
                entries.pop(domain);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %domain, "cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn put_at(&self, domain: &str, address: &str, now: Instant) {
        let entry = CacheEntry {
            address: Arc::from(address),
            inserted_at: now,
        };
        let mut entries = self.lock();
        if let Some((evicted, _)) = entries.push(domain.to_string(), entry) {
            if evicted != domain {
                debug!(domain = %evicted, "evicted least recently used entry");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl ResolutionCachePort for ResolutionCache {
    fn get(&self, domain: &str) -> Option<Arc<str>> {
        self.get_at(domain, Instant::now())
    }

    fn put(&self, domain: &str, address: &str) {
        self.put_at(domain, address, Instant::now());
    }

    fn remove(&self, domain: &str) -> bool {
        self.lock().pop(domain).is_some()
    }

    fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits,
            misses,
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    fn cache(capacity: usize) -> ResolutionCache {
        ResolutionCache::new(capacity, TTL)
    }

    #[test]
    fn get_within_ttl_returns_the_address() {
        let cache = cache(10);
        let t0 = Instant::now();
        cache.put_at("example.com", "203.0.113.5", t0);

        let got = cache.get_at("example.com", t0 + TTL - Duration::from_secs(1));
        assert_eq!(got.as_deref(), Some("203.0.113.5"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn expired_entry_is_removed_and_counted_as_miss() {
        let cache = cache(10);
        let t0 = Instant::now();
        cache.put_at("example.com", "203.0.113.5", t0);

        assert_eq!(cache.get_at("example.com", t0 + TTL), None);
        assert_eq!(cache.len(), 0);
        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn absent_domain_is_a_miss() {
        let cache = cache(10);
        assert_eq!(cache.get_at("nosuch.com", Instant::now()), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn put_evicts_the_least_recently_used_entry() {
        let cache = cache(2);
        let t0 = Instant::now();
        cache.put_at("a.com", "10.0.0.1", t0);
        cache.put_at("b.com", "10.0.0.2", t0);
        cache.put_at("c.com", "10.0.0.3", t0);

        assert_eq!(cache.get_at("a.com", t0), None);
        assert_eq!(cache.get_at("b.com", t0).as_deref(), Some("10.0.0.2"));
        assert_eq!(cache.get_at("c.com", t0).as_deref(), Some("10.0.0.3"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn access_protects_an_entry_from_eviction() {
        let cache = cache(2);
        let t0 = Instant::now();
        cache.put_at("a.com", "10.0.0.1", t0);
        cache.put_at("b.com", "10.0.0.2", t0);
        // touching a makes b the least recently used
        assert!(cache.get_at("a.com", t0).is_some());
        cache.put_at("c.com", "10.0.0.3", t0);

        assert_eq!(cache.get_at("b.com", t0), None);
        assert_eq!(cache.get_at("a.com", t0).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn put_on_existing_key_refreshes_the_timestamp() {
        let cache = cache(10);
        let t0 = Instant::now();
        cache.put_at("example.com", "203.0.113.5", t0);
        cache.put_at("example.com", "203.0.113.6", t0 + TTL);

        // the refreshed entry is fresh again at t0 + TTL
        let got = cache.get_at("example.com", t0 + TTL + Duration::from_secs(1));
        assert_eq!(got.as_deref(), Some("203.0.113.6"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let cache = cache(3);
        let t0 = Instant::now();
        for i in 0..20 {
            cache.put_at(&format!("d{i}.com"), "10.0.0.1", t0);
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn hit_rate_is_hits_over_lookups() {
        let cache = cache(10);
        let t0 = Instant::now();
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.put_at("a.com", "10.0.0.1", t0);
        cache.get_at("a.com", t0); // hit
        cache.get_at("a.com", t0); // hit
        cache.get_at("z.com", t0); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn remove_invalidates_an_entry() {
        let cache = cache(10);
        let t0 = Instant::now();
        cache.put_at("example.com", "203.0.113.5", t0);

        assert!(cache.remove("example.com"));
        assert!(!cache.remove("example.com"));
        assert_eq!(cache.get_at("example.com", t0), None);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let cache = ResolutionCache::new(0, TTL);
        let t0 = Instant::now();
        cache.put_at("a.com", "10.0.0.1", t0);
        assert_eq!(cache.len(), 1);
    }
}
