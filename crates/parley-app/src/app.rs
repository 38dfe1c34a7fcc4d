//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the chat view completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs
//! and produces [`crate::AppAction`] instructions for the frontend to
//! execute.
//!
//! # Responsibilities
//!
//! - Maintains the bounded transcript and the connection indicator state.
//! - Owns the message and nickname fields, the focus selector, and the
//!   committed session identity.
//! - Validates outbound drafts through the [`crate::composer`] and turns
//!   accepted ones into send instructions.

use std::time::Instant;

use crate::{
    AppAction, AppEvent, ConnectionState, Focus, InputState, KeyInput, Transcript, ViewConfig,
    composer::{self, ComposeError},
    state::sanitize,
};

const CONNECTED_NOTICE: &str = "Connected. Say hello!";
const DISCONNECTED_NOTICE: &str = "Connection lost. Reconnecting...";
const RECONNECTED_NOTICE: &str = "Reconnected to the server.";
const RECONNECT_FAILED_NOTICE: &str = "Reconnection failed. Restart the client to continue.";
const CONNECT_ERROR_NOTICE: &str = "Could not reach the server. Another attempt will follow.";
const SERVICE_ERROR_FALLBACK: &str = "The service reported an unknown error.";

/// Chat view state machine.
///
/// Pure state machine that processes events and produces actions. No I/O
/// dependencies; fully testable without a terminal or a socket.
#[derive(Debug, Clone)]
pub struct App {
    /// View parameters (transcript bound, notice lifetime).
    config: ViewConfig,
    /// Connection indicator state.
    connection: ConnectionState,
    /// Bounded message log.
    transcript: Transcript,
    /// Committed display name. Empty until first commit.
    nickname: String,
    /// True when the user deliberately set the nickname; false for guest
    /// identities.
    nickname_explicit: bool,
    /// Message draft field.
    message_input: InputState,
    /// Nickname field.
    nickname_input: InputState,
    /// Which field receives keystrokes.
    focus: Focus,
    /// Last known user list from the service.
    users: Vec<String>,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Time of the most recent tick. Notices posted by key events are
    /// stamped with this.
    now: Instant,
}

impl App {
    /// Create a new App with the given view configuration.
    pub fn new(config: ViewConfig) -> Self {
        let transcript = Transcript::new(config.max_entries);
        Self {
            config,
            connection: ConnectionState::Connecting,
            transcript,
            nickname: String::new(),
            nickname_explicit: false,
            message_input: InputState::new(),
            nickname_input: InputState::new(),
            focus: Focus::Message,
            users: Vec::new(),
            terminal_size: (80, 24),
            now: Instant::now(),
        }
    }

    /// Process an event and return actions for the frontend.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick { now } => {
                self.now = now;
                if self.transcript.expire_notices(now, self.config.notice_ttl) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::FocusRegained => {
                self.focus = Focus::Message;
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.connection = ConnectionState::Connected;
                self.transcript.push_notice(CONNECTED_NOTICE, None, self.now);
                vec![AppAction::RequestUserList, AppAction::Render]
            },
            AppEvent::Disconnected { reason } => {
                tracing::info!(?reason, "connection lost");
                self.connection = ConnectionState::Disconnected;
                self.transcript.push_notice(DISCONNECTED_NOTICE, None, self.now);
                vec![AppAction::Render]
            },
            AppEvent::ReconnectAttempt { attempt } => {
                self.connection = ConnectionState::Reconnecting { attempt };
                let text = format!("Reconnecting... (attempt {attempt})");
                self.transcript.push_notice(&text, None, self.now);
                vec![AppAction::Render]
            },
            AppEvent::Reconnected => {
                self.connection = ConnectionState::Connected;
                self.transcript.push_notice(RECONNECTED_NOTICE, None, self.now);
                vec![AppAction::RequestUserList, AppAction::Render]
            },
            AppEvent::ReconnectFailed => {
                self.connection = ConnectionState::ReconnectFailed;
                self.transcript.push_notice(RECONNECT_FAILED_NOTICE, None, self.now);
                vec![AppAction::Render]
            },
            AppEvent::ConnectError { message } => {
                tracing::warn!(?message, "connection attempt failed");
                if !self.connection.is_terminal() {
                    self.connection = ConnectionState::Disconnected;
                }
                self.transcript.push_notice(CONNECT_ERROR_NOTICE, None, self.now);
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { username, message, timestamp } => {
                self.transcript.push_chat(&username, &message, timestamp.as_deref());
                vec![AppAction::Render]
            },
            AppEvent::StatusReceived { msg, user_count } => {
                self.transcript.push_notice(&msg, user_count, self.now);
                vec![AppAction::Render]
            },
            AppEvent::UserListReceived { users } => {
                tracing::debug!(count = users.len(), "user list updated");
                self.users = users.iter().map(|user| sanitize(user)).collect();
                vec![AppAction::Render]
            },
            AppEvent::ServiceError { msg } => {
                let text = msg.as_deref().unwrap_or(SERVICE_ERROR_FALLBACK);
                self.transcript.push_notice(text, None, self.now);
                vec![AppAction::Render]
            },
        }
    }

    /// Pre-fill and commit a nickname (e.g. from the command line).
    pub fn set_nickname(&mut self, name: &str) {
        self.nickname_input.set_text(name);
        self.commit_nickname();
    }

    /// Current connection indicator state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// The bounded message log.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Committed display name. Empty until a nickname was committed.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// True when the user deliberately set the nickname.
    pub fn nickname_explicit(&self) -> bool {
        self.nickname_explicit
    }

    /// Message draft field.
    pub fn message_input(&self) -> &InputState {
        &self.message_input
    }

    /// Nickname field.
    pub fn nickname_input(&self) -> &InputState {
        &self.nickname_input
    }

    /// Which field receives keystrokes.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Last known user list.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => vec![AppAction::Quit],
            KeyInput::Tab => {
                // Leaving the nickname field commits it, like losing focus
                if self.focus == Focus::Nickname {
                    self.commit_nickname();
                    self.focus = Focus::Message;
                } else {
                    self.focus = Focus::Nickname;
                }
                vec![AppAction::Render]
            },
            KeyInput::Enter => match self.focus {
                Focus::Message => self.submit_message(),
                Focus::Nickname => {
                    self.commit_nickname();
                    self.focus = Focus::Message;
                    vec![AppAction::Render]
                },
            },
            key => {
                let field = match self.focus {
                    Focus::Message => &mut self.message_input,
                    Focus::Nickname => &mut self.nickname_input,
                };
                if field.apply(key) { vec![AppAction::Render] } else { vec![] }
            },
        }
    }

    /// Validate the draft and emit a send, or surface why not.
    ///
    /// Rejected drafts keep their content: an empty draft just refocuses
    /// the field, an over-length one additionally posts a warning notice.
    fn submit_message(&mut self) -> Vec<AppAction> {
        match composer::compose(self.message_input.buffer(), self.nickname_input.buffer()) {
            Ok(message) => {
                self.nickname = message.username.clone();
                self.nickname_explicit = !self.nickname_input.buffer().trim().is_empty();
                self.message_input.clear();
                self.focus = Focus::Message;
                tracing::debug!(username = %message.username, "sending chat message");
                vec![AppAction::Send { message }, AppAction::Render]
            },
            Err(ComposeError::Empty) => {
                self.focus = Focus::Message;
                vec![AppAction::Render]
            },
            Err(err @ ComposeError::TooLong { .. }) => {
                self.transcript.push_notice(&err.to_string(), None, self.now);
                self.focus = Focus::Message;
                vec![AppAction::Render]
            },
        }
    }

    fn commit_nickname(&mut self) {
        let raw = self.nickname_input.buffer().trim();
        if raw.is_empty() {
            self.nickname = composer::guest_nickname();
            self.nickname_explicit = false;
        } else {
            self.nickname = raw.chars().take(composer::MAX_NICKNAME_CHARS).collect();
            self.nickname_explicit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let _ = app.handle(AppEvent::Key(KeyInput::Char(c)));
        }
    }

    #[test]
    fn connected_requests_user_list() {
        let mut app = App::new(ViewConfig::default());
        let actions = app.handle(AppEvent::Connected);

        assert!(matches!(
            actions.as_slice(),
            [AppAction::RequestUserList, AppAction::Render]
        ));
        assert_eq!(app.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn enter_sends_trimmed_draft_and_clears_input() {
        let mut app = App::new(ViewConfig::default());
        app.set_nickname("mina");
        type_text(&mut app, "  hello  ");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        let [AppAction::Send { message }, AppAction::Render] = actions.as_slice() else {
            unreachable!("expected send + render, got {actions:?}");
        };
        assert_eq!(message.message, "hello");
        assert_eq!(message.username, "mina");
        assert!(app.message_input().buffer().is_empty());
    }

    #[test]
    fn empty_draft_does_not_send() {
        let mut app = App::new(ViewConfig::default());
        type_text(&mut app, "   ");

        let actions = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(!actions.iter().any(|a| matches!(a, AppAction::Send { .. })));
        assert_eq!(app.focus(), Focus::Message);
    }

    #[test]
    fn esc_quits() {
        let mut app = App::new(ViewConfig::default());
        let actions = app.handle(AppEvent::Key(KeyInput::Esc));

        assert!(matches!(actions.as_slice(), [AppAction::Quit]));
    }

    #[test]
    fn tab_switches_fields_and_commits_nickname_on_leave() {
        let mut app = App::new(ViewConfig::default());

        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        assert_eq!(app.focus(), Focus::Nickname);

        type_text(&mut app, "bora");
        let _ = app.handle(AppEvent::Key(KeyInput::Tab));

        assert_eq!(app.focus(), Focus::Message);
        assert_eq!(app.nickname(), "bora");
        assert!(app.nickname_explicit());
    }

    #[test]
    fn empty_nickname_commit_yields_guest() {
        let mut app = App::new(ViewConfig::default());

        let _ = app.handle(AppEvent::Key(KeyInput::Tab));
        let _ = app.handle(AppEvent::Key(KeyInput::Enter));

        assert!(app.nickname().starts_with(composer::GUEST_PREFIX));
        assert!(!app.nickname_explicit());
        assert_eq!(app.focus(), Focus::Message);
    }

    #[test]
    fn resize_is_tracked() {
        let mut app = App::new(ViewConfig::default());
        let _ = app.handle(AppEvent::Resize(120, 40));

        assert_eq!(app.terminal_size(), (120, 40));
    }

    #[test]
    fn connect_error_does_not_clobber_terminal_state() {
        let mut app = App::new(ViewConfig::default());
        let _ = app.handle(AppEvent::ReconnectFailed);
        let _ = app.handle(AppEvent::ConnectError { message: Some("refused".into()) });

        assert_eq!(app.connection_state(), ConnectionState::ReconnectFailed);
    }
}
