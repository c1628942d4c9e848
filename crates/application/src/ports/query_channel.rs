use async_trait::async_trait;
use hopdns_domain::{Message, ResolveError};

/// Synchronous one-shot exchange with a remote server: connect to `addr`
/// (`host:port`), write one encoded message, read exactly one encoded reply.
///
/// Failures are uniform: the caller cannot tell a refused connection from a
/// timeout or a partial read, and no implementation retries.
#[async_trait]
pub trait QueryChannel: Send + Sync {
    async fn exchange(&self, addr: &str, message: &Message) -> Result<Message, ResolveError>;
}
