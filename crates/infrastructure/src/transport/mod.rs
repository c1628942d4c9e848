//! TCP transport: one connection per query, one framed message each way.

mod tcp;

pub use tcp::TcpQueryChannel;

use hopdns_domain::ResolveError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Wire messages are short text frames; anything larger is a peer bug.
const MAX_MESSAGE_SIZE: usize = 4096;

/// Writes a `u16` big-endian length prefix followed by the message bytes.
pub(crate) async fn write_frame<S>(stream: &mut S, bytes: &[u8]) -> Result<(), ResolveError>
where
    S: AsyncWriteExt + Unpin,
{
    if bytes.len() > MAX_MESSAGE_SIZE {
        return Err(ResolveError::Io(format!(
            "message too large: {} bytes (max {MAX_MESSAGE_SIZE})",
            bytes.len()
        )));
    }
    let length = (bytes.len() as u16).to_be_bytes();
    stream
        .write_all(&length)
        .await
        .map_err(|e| ResolveError::Io(format!("failed to write length prefix: {e}")))?;
    stream
        .write_all(bytes)
        .await
        .map_err(|e| ResolveError::Io(format!("failed to write message: {e}")))?;
    stream
        .flush()
        .await
        .map_err(|e| ResolveError::Io(format!("failed to flush stream: {e}")))?;
    Ok(())
}

/// Reads exactly one length-prefixed frame.
pub(crate) async fn read_frame<S>(stream: &mut S) -> Result<Vec<u8>, ResolveError>
where
    S: AsyncReadExt + Unpin,
{
    let mut length_buf = [0u8; 2];
    stream
        .read_exact(&mut length_buf)
        .await
        .map_err(|e| ResolveError::Io(format!("failed to read length prefix: {e}")))?;
    let length = u16::from_be_bytes(length_buf) as usize;
    if length > MAX_MESSAGE_SIZE {
        return Err(ResolveError::Io(format!(
            "message too large: {length} bytes (max {MAX_MESSAGE_SIZE})"
        )));
    }
    let mut bytes = vec![0u8; length];
    stream
        .read_exact(&mut bytes)
        .await
        .map_err(|e| ResolveError::Io(format!("failed to read message body: {e}")))?;
    Ok(bytes)
}
