use crate::ports::{QueryChannel, QueryHandler, ResolutionCachePort};
use async_trait::async_trait;
use hopdns_domain::{
    Delegation, DelegationRole, Hop, Message, Query, ResolveError, Response, ResponseResult,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters accumulated over one resolver instance's lifetime, merged with
/// the cache counters it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverStats {
    pub total_queries: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_rate: f64,
    /// Wall-clock time from query receipt to response ready, averaged over
    /// every terminal path, in milliseconds.
    pub avg_resolution_ms: f64,
}

/// The local resolver: answers from the cache when it can, otherwise walks
/// the delegation chain root -> TLD -> authoritative and caches the answer.
///
/// The chain is strictly three hops with no retry and no backtracking; the
/// first failing hop is terminal for the query. Every terminal success
/// writes exactly one cache entry, every failure writes none.
pub struct ResolveDomainUseCase {
    channel: Arc<dyn QueryChannel>,
    cache: Arc<dyn ResolutionCachePort>,
    root_addr: String,
    total_queries: AtomicU64,
    total_resolution_micros: AtomicU64,
}

impl ResolveDomainUseCase {
    pub fn new(
        channel: Arc<dyn QueryChannel>,
        cache: Arc<dyn ResolutionCachePort>,
        root_addr: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            cache,
            root_addr: root_addr.into(),
            total_queries: AtomicU64::new(0),
            total_resolution_micros: AtomicU64::new(0),
        }
    }

    pub async fn execute(&self, query: &Query) -> Response {
        let start = Instant::now();
        let sequence = self.total_queries.fetch_add(1, Ordering::Relaxed) + 1;
        // Matching is case-insensitive; the response echoes the original
        // spelling for display.
        let domain = query.domain.to_ascii_lowercase();

        if let Some(address) = self.cache.get(&domain) {
            self.record_elapsed(start);
            info!(query = sequence, domain = %domain, address = %address, "cache hit");
            return Response::ip(query.id, query.domain.clone(), address.as_ref());
        }

        debug!(query = sequence, domain = %domain, "cache miss, starting iterative resolution");
        let outcome = self.walk_chain(query.id, &domain).await;
        self.record_elapsed(start);

        match outcome {
            Ok(address) => {
                self.cache.put(&domain, &address);
                info!(query = sequence, domain = %domain, address = %address, "resolved");
                Response::ip(query.id, query.domain.clone(), address)
            }
            Err(e) => {
                warn!(query = sequence, domain = %domain, reason = %e, "resolution failed");
                Response::error(query.id, query.domain.clone(), e.to_string())
            }
        }
    }

    /// Root -> TLD -> authoritative, forwarding the same query id and the
    /// normalized domain at every hop.
    async fn walk_chain(&self, id: u64, domain: &str) -> Result<String, ResolveError> {
        let query = Query::new(id, domain);

        let reply = self.ask(Hop::Root, &self.root_addr, &query).await?;
        let referral = match reply.result {
            ResponseResult::Error(reason) => return Err(ResolveError::Delegation(reason)),
            ResponseResult::Ns(d) if d.role == DelegationRole::Tld => d,
            _ => return Err(ResolveError::UnexpectedResponse(Hop::Root)),
        };
        debug!(domain = %domain, tld_server = %referral.authority(), "root referred to TLD server");

        let reply = self.ask(Hop::Tld, &referral.authority(), &query).await?;
        let referral = match reply.result {
            ResponseResult::Error(reason) => return Err(ResolveError::Delegation(reason)),
            // A TLD server may answer with an address directly; accepted as
            // terminal for compatibility with the permissive original chain.
            ResponseResult::Ip(address) => return Ok(address),
            ResponseResult::Ns(d) if d.role == DelegationRole::Auth => d,
            _ => return Err(ResolveError::UnexpectedResponse(Hop::Tld)),
        };
        debug!(domain = %domain, auth_server = %referral.authority(), "TLD referred to authoritative server");

        let reply = self.ask(Hop::Auth, &referral.authority(), &query).await?;
        match reply.result {
            ResponseResult::Ip(address) => Ok(address),
            ResponseResult::Error(reason) => Err(ResolveError::Delegation(reason)),
            ResponseResult::Ns(_) => Err(ResolveError::UnexpectedResponse(Hop::Auth)),
        }
    }

    async fn ask(&self, hop: Hop, addr: &str, query: &Query) -> Result<Response, ResolveError> {
        let message = Message::Query(query.clone());
        let reply = self
            .channel
            .exchange(addr, &message)
            .await
            .map_err(|e| {
                warn!(hop = hop.as_str(), addr = %addr, error = %e, "exchange failed");
                ResolveError::Transport(hop)
            })?;
        match reply {
            Message::Response(response) => Ok(response),
            Message::Query(_) => Err(ResolveError::UnexpectedResponse(hop)),
        }
    }

    fn record_elapsed(&self, start: Instant) {
        let micros = start.elapsed().as_micros() as u64;
        self.total_resolution_micros
            .fetch_add(micros, Ordering::Relaxed);
    }

    pub fn stats(&self) -> ResolverStats {
        let cache = self.cache.stats();
        let total_queries = self.total_queries.load(Ordering::Relaxed);
        let total_micros = self.total_resolution_micros.load(Ordering::Relaxed);
        let avg_resolution_ms = if total_queries == 0 {
            0.0
        } else {
            total_micros as f64 / 1000.0 / total_queries as f64
        };
        ResolverStats {
            total_queries,
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            hit_rate: cache.hit_rate,
            avg_resolution_ms,
        }
    }
}

#[async_trait]
impl QueryHandler for ResolveDomainUseCase {
    async fn handle(&self, query: &Query) -> Response {
        self.execute(query).await
    }
}
