use async_trait::async_trait;
use hopdns_application::ports::QueryHandler;
use hopdns_domain::{Delegation, DelegationRole, Query, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// TLD name server for one zone (e.g. `.com`): refers every domain under
/// its suffix to the configured authoritative server. The suffix match
/// alone gates delegation; the rest of the name is not inspected.
pub struct TldZone {
    tld: String,
    suffix: String,
    authority: Delegation,
    queries: AtomicU64,
}

impl TldZone {
    pub fn new(tld: &str, auth_host: &str, auth_port: u16) -> Self {
        let tld = tld.trim_start_matches('.').to_ascii_lowercase();
        Self {
            suffix: format!(".{tld}"),
            tld,
            authority: Delegation::new(DelegationRole::Auth, auth_host, auth_port),
            queries: AtomicU64::new(0),
        }
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QueryHandler for TldZone {
    async fn handle(&self, query: &Query) -> Response {
        let sequence = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        if query.domain.to_ascii_lowercase().ends_with(&self.suffix) {
            info!(
                query = sequence,
                domain = %query.domain,
                tld = %self.tld,
                server = %self.authority.authority(),
                "delegating to authoritative server"
            );
            Response::delegation(query.id, query.domain.clone(), self.authority.clone())
        } else {
            info!(query = sequence, domain = %query.domain, tld = %self.tld, "domain outside zone");
            Response::error(
                query.id,
                query.domain.clone(),
                format!("domain not under .{}", self.tld),
            )
        }
    }
}
