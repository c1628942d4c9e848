use async_trait::async_trait;
use hopdns_application::ports::{CacheStats, QueryChannel, ResolutionCachePort};
use hopdns_domain::{Message, ResolveError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted transport: replies are queued per address, consumed in order.
/// An address with no scripted reply behaves like an unreachable server.
pub struct MockQueryChannel {
    replies: Mutex<HashMap<String, VecDeque<Result<Message, ResolveError>>>>,
    calls: Mutex<Vec<(String, Message)>>,
}

impl MockQueryChannel {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn enqueue(&self, addr: &str, reply: Result<Message, ResolveError>) {
        self.replies
            .lock()
            .unwrap()
            .entry(addr.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<(String, Message)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryChannel for MockQueryChannel {
    async fn exchange(&self, addr: &str, message: &Message) -> Result<Message, ResolveError> {
        self.calls
            .lock()
            .unwrap()
            .push((addr.to_string(), message.clone()));
        self.replies
            .lock()
            .unwrap()
            .get_mut(addr)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(ResolveError::Io(format!("no scripted reply for {addr}"))))
    }
}

/// Unbounded map-backed cache with the port's hit/miss accounting; capacity
/// and TTL behavior is covered by the real cache's own tests.
pub struct MockResolutionCache {
    entries: Mutex<HashMap<String, Arc<str>>>,
    hits: Mutex<u64>,
    misses: Mutex<u64>,
}

impl MockResolutionCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: Mutex::new(0),
            misses: Mutex::new(0),
        }
    }

    pub fn seed(&self, domain: &str, address: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(domain.to_string(), Arc::from(address));
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.entries.lock().unwrap().contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl ResolutionCachePort for MockResolutionCache {
    fn get(&self, domain: &str) -> Option<Arc<str>> {
        let found = self.entries.lock().unwrap().get(domain).cloned();
        match &found {
            Some(_) => *self.hits.lock().unwrap() += 1,
            None => *self.misses.lock().unwrap() += 1,
        }
        found
    }

    fn put(&self, domain: &str, address: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(domain.to_string(), Arc::from(address));
    }

    fn remove(&self, domain: &str) -> bool {
        self.entries.lock().unwrap().remove(domain).is_some()
    }

    fn stats(&self) -> CacheStats {
        let hits = *self.hits.lock().unwrap();
        let misses = *self.misses.lock().unwrap();
        let total = hits + misses;
        CacheStats {
            entries: self.entries.lock().unwrap().len(),
            capacity: usize::MAX,
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
