use async_trait::async_trait;
use hopdns_domain::{Query, Response};

/// One contract shared by every participant that answers queries: the three
/// zone stubs and the caching resolver. A handler always produces a
/// well-formed response; failures travel as the `ERROR` result kind, never
/// as a Rust error.
#[async_trait]
pub trait QueryHandler: Send + Sync {
    async fn handle(&self, query: &Query) -> Response;
}
