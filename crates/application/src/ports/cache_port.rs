use std::sync::Arc;

/// Point-in-time view of the resolution cache counters.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), 0.0 before the first lookup.
    pub hit_rate: f64,
}

/// Bounded, time-expiring answer cache owned by one resolver instance.
/// Implementations are internally synchronized; callers may share one
/// instance across connection tasks.
pub trait ResolutionCachePort: Send + Sync {
    /// Fresh entry: touch most-recently-used, count a hit, return the
    /// address. Expired entry: drop it and count a miss. Absent: miss.
    fn get(&self, domain: &str) -> Option<Arc<str>>;

    /// Insert or refresh, evicting the least-recently-used entry first
    /// when a new key would exceed capacity.
    fn put(&self, domain: &str, address: &str);

    /// Explicit invalidation. Returns whether an entry was removed.
    fn remove(&self, domain: &str) -> bool;

    fn stats(&self) -> CacheStats;
}
