use super::{read_frame, write_frame};
use async_trait::async_trait;
use hopdns_application::ports::QueryChannel;
use hopdns_domain::{Message, ResolveError};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// One-shot TCP exchange: fresh connection per query, single framed message
/// each way, closed afterwards. The whole round trip runs under one
/// timeout; the caller sees every failure (connect, write, read, decode,
/// timeout) as the same uniform channel error.
pub struct TcpQueryChannel {
    timeout: Duration,
}

impl TcpQueryChannel {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn round_trip(&self, addr: &str, message: &Message) -> Result<Message, ResolveError> {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| ResolveError::Io(format!("failed to connect to {addr}: {e}")))?;
        write_frame(&mut stream, &message.encode()).await?;
        debug!(addr = %addr, domain = %message.domain(), "query sent");
        let reply = read_frame(&mut stream).await?;
        Message::decode(&reply)
    }
}

#[async_trait]
impl QueryChannel for TcpQueryChannel {
    async fn exchange(&self, addr: &str, message: &Message) -> Result<Message, ResolveError> {
        tokio::time::timeout(self.timeout, self.round_trip(addr, message))
            .await
            .map_err(|_| ResolveError::Io(format!("timed out waiting for {addr}")))?
    }
}
