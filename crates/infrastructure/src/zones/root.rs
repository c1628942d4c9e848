use async_trait::async_trait;
use hopdns_application::ports::QueryHandler;
use hopdns_domain::message::split_host_port;
use hopdns_domain::{Delegation, DelegationRole, Query, ResolveError, Response};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Root name server: maps the rightmost label of a query's domain to the
/// TLD server owning that zone.
pub struct RootZone {
    tld_servers: HashMap<String, Delegation>,
    queries: AtomicU64,
}

impl RootZone {
    /// Builds the delegation table from `tld -> host:port` configuration.
    pub fn new(tlds: &BTreeMap<String, String>) -> Result<Self, ResolveError> {
        let mut tld_servers = HashMap::new();
        for (tld, addr) in tlds {
            let (host, port) = split_host_port(addr).ok_or_else(|| {
                ResolveError::Config(format!("invalid TLD server address '{addr}' for .{tld}"))
            })?;
            tld_servers.insert(
                tld.to_ascii_lowercase(),
                Delegation::new(DelegationRole::Tld, host, port),
            );
        }
        Ok(Self {
            tld_servers,
            queries: AtomicU64::new(0),
        })
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

/// The rightmost label, or `None` when fewer than two labels exist
/// (an unqualified name carries no TLD).
fn tld_of(domain: &str) -> Option<String> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return None;
    }
    labels.last().map(|label| label.to_ascii_lowercase())
}

#[async_trait]
impl QueryHandler for RootZone {
    async fn handle(&self, query: &Query) -> Response {
        let sequence = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        let Some(tld) = tld_of(&query.domain) else {
            info!(query = sequence, domain = %query.domain, "unqualified name");
            return Response::error(query.id, query.domain.clone(), "unqualified domain name");
        };
        match self.tld_servers.get(&tld) {
            Some(delegation) => {
                info!(
                    query = sequence,
                    domain = %query.domain,
                    tld = %tld,
                    server = %delegation.authority(),
                    "delegating to TLD server"
                );
                Response::delegation(query.id, query.domain.clone(), delegation.clone())
            }
            None => {
                info!(query = sequence, domain = %query.domain, tld = %tld, "unknown TLD");
                Response::error(
                    query.id,
                    query.domain.clone(),
                    format!("no TLD server for .{tld}"),
                )
            }
        }
    }
}
