//! Application input events.
//!
//! This module defines [`AppEvent`], the full set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interactions (keyboard, resize, focus) and periodic ticks.
//! - Transport lifecycle transitions from the connection supervisor.
//! - Service events decoded from the wire.

use std::time::Instant;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick carrying the current time. Drives notice auto-hide.
    Tick {
        /// Current time.
        now: Instant,
    },

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The terminal regained focus (debounced by the frontend). Returns
    /// focus to the message field.
    FocusRegained,

    /// Initial connection in progress.
    Connecting,

    /// Connected to the service.
    Connected,

    /// Connection lost.
    Disconnected {
        /// Transport-supplied reason, if any.
        reason: Option<String>,
    },

    /// A reconnect attempt is starting.
    ReconnectAttempt {
        /// 1-based attempt count.
        attempt: u32,
    },

    /// Reconnected after a connection loss.
    Reconnected,

    /// Every reconnect attempt failed; the connection is gone for good.
    ReconnectFailed,

    /// A connection attempt failed.
    ConnectError {
        /// Transport error detail, if any. Logged, not displayed.
        message: Option<String>,
    },

    /// Chat message received.
    MessageReceived {
        /// Sender's display name.
        username: String,
        /// Message body.
        message: String,
        /// Sender-local time string, when provided.
        timestamp: Option<String>,
    },

    /// Status notice received (join, leave, announcements).
    StatusReceived {
        /// Status text.
        msg: String,
        /// Live user count, when provided.
        user_count: Option<u64>,
    },

    /// Current user list received.
    UserListReceived {
        /// Identifiers of connected users.
        users: Vec<String>,
    },

    /// Service-reported error.
    ServiceError {
        /// Error description, when the service provides one.
        msg: Option<String>,
    },
}
