//! Protocol error types.
//!
//! Strongly-typed errors for the JSON event boundary. We avoid leaking
//! `serde_json::Error` directly so callers can distinguish the encode and
//! decode directions when reporting failures.

use thiserror::Error;

/// Errors produced while encoding or decoding service events.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An outbound event could not be serialized.
    #[error("event encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound frame was not a recognized event.
    #[error("malformed event: {0}")]
    Decode(#[source] serde_json::Error),
}
