//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, the instructions produced by
//! the [`crate::App`] state machine for the frontend to execute.

use parley_proto::ChatMessage;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application. The frontend closes the connection on the way
    /// out.
    Quit,

    /// Send a chat message to the service. Fire-and-forget; no delivery
    /// acknowledgement exists.
    Send {
        /// Validated outbound payload.
        message: ChatMessage,
    },

    /// Ask the service for the current user list. Fire-and-forget.
    RequestUserList,
}
