use crate::hop::Hop;
use thiserror::Error;

/// Every failure mode a query can hit. The `Display` text of the variants
/// that reach a client is the exact reason string carried in the `ERROR`
/// response, so the wording here is part of the wire contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A frame that does not match the message grammar. Raised locally at
    /// decode time and never sent over the wire.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Connect/send/receive failed at a hop. All transport failures are
    /// uniform; nothing distinguishes a refused connection from a timeout.
    #[error("{0} server error")]
    Transport(Hop),

    /// A server in the chain had no applicable table entry. The reason
    /// text comes from that server and is propagated verbatim.
    #[error("{0}")]
    Delegation(String),

    /// A reply carried a result kind the chain does not expect at that hop.
    #[error("unexpected response from {0}")]
    UnexpectedResponse(Hop),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}
