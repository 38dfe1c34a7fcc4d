//! Wire protocol for the Parley chat service
//!
//! The service speaks JSON text frames over a websocket, one event per
//! frame, wrapped in an `{"event": <name>, "data": <payload>}` envelope.
//! Event names are the compatibility contract with deployed services and
//! must be preserved exactly.
//!
//! This crate contains no I/O: it defines the event types and their JSON
//! encoding, nothing else.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;

pub use error::ProtocolError;
pub use event::{ChatMessage, ClientEvent, ServerEvent, ServiceError, StatusNotice, UserList};
