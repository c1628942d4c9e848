//! Generic accept loop shared by all four server roles.

use crate::transport::{read_frame, write_frame};
use hopdns_application::ports::QueryHandler;
use hopdns_domain::{Message, ResolveError};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

pub async fn bind(addr: &str) -> Result<TcpListener, ResolveError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ResolveError::Io(format!("failed to bind {addr}: {e}")))?;
    Ok(listener)
}

/// Accepts connections forever, one spawned task per connection. Each
/// connection carries exactly one query and receives exactly one response.
pub async fn serve(listener: TcpListener, handler: Arc<dyn QueryHandler>) -> Result<(), ResolveError> {
    let local = listener
        .local_addr()
        .map_err(|e| ResolveError::Io(e.to_string()))?;
    info!(addr = %local, "listening");
    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| ResolveError::Io(format!("accept failed: {e}")))?;
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, handler).await {
                // A malformed frame is never answered; the peer only sees
                // the connection close.
                warn!(peer = %peer, error = %e, "connection dropped");
            }
        });
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    handler: Arc<dyn QueryHandler>,
) -> Result<(), ResolveError> {
    let bytes = read_frame(&mut stream).await?;
    let query = match Message::decode(&bytes)? {
        Message::Query(query) => query,
        Message::Response(_) => {
            return Err(ResolveError::MalformedMessage(
                "expected a query, got a response".to_string(),
            ))
        }
    };
    let response = handler.handle(&query).await;
    write_frame(&mut stream, &Message::Response(response).encode()).await
}
