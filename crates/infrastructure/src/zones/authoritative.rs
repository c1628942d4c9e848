use async_trait::async_trait;
use hopdns_application::ports::QueryHandler;
use hopdns_domain::{Query, Response};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Authoritative name server: the source of truth mapping exact domain
/// names to addresses.
pub struct AuthoritativeZone {
    records: HashMap<String, String>,
    queries: AtomicU64,
}

impl AuthoritativeZone {
    /// Keys are expected lowercased; `load_records` guarantees that.
    pub fn new(records: HashMap<String, String>) -> Self {
        Self {
            records,
            queries: AtomicU64::new(0),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QueryHandler for AuthoritativeZone {
    async fn handle(&self, query: &Query) -> Response {
        let sequence = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        match self.records.get(&query.domain.to_ascii_lowercase()) {
            Some(address) => {
                info!(query = sequence, domain = %query.domain, address = %address, "answering");
                Response::ip(query.id, query.domain.clone(), address.clone())
            }
            None => {
                info!(query = sequence, domain = %query.domain, "no record");
                Response::error(query.id, query.domain.clone(), "domain not found")
            }
        }
    }
}
