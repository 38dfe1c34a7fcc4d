//! Connection layer for the Parley chat service
//!
//! One [`ChatSocket`] handle per view: events go out through a channel,
//! lifecycle transitions and inbound traffic come back through another,
//! and a supervisor task owns the websocket in between, including
//! automatic reconnection with bounded backoff.
//!
//! Messages handed to the socket while the connection is down are dropped,
//! not queued; the service offers no replay, so buffering them would only
//! fake a delivery guarantee that does not exist.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
pub mod transport;

pub use config::ConnectConfig;
pub use transport::{ChatSocket, TransportError, TransportEvent, connect};
