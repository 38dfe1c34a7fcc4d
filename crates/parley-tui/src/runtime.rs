//! Async runtime
//!
//! Event loop that drives terminal I/O and coordinates between the App
//! state machine and the chat socket. Uses `tokio::select!` to handle
//! terminal events, transport events, and the periodic tick concurrently.

use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{DisableFocusChange, EnableFocusChange, Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parley_app::{App, AppAction, AppEvent, KeyInput, ViewConfig};
use parley_client::{ChatSocket, ConnectConfig, TransportEvent};
use parley_proto::{ClientEvent, ServerEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Async runtime for the TUI.
///
/// Owns the terminal, the [`App`] state machine, and the one chat socket.
/// Construct it once and call [`Runtime::run`] exactly once; dropping it
/// closes the connection and restores the terminal.
pub struct Runtime {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    socket: ChatSocket,
    /// True once the supervisor task ended and the event channel closed.
    /// Gates the receive arm of the select loop so it stops polling a
    /// closed channel.
    socket_closed: bool,
    /// Deadline for the debounced refocus after the terminal regains
    /// focus. `None` when no refocus is pending.
    refocus_at: Option<Instant>,
    refocus_delay: Duration,
}

impl Runtime {
    /// Set up the terminal, open the chat connection, and build the view.
    pub fn new(
        server_url: String,
        nickname: Option<&str>,
        view: ViewConfig,
        connect: ConnectConfig,
    ) -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(EnableFocusChange)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let refocus_delay = view.refocus_delay;
        let mut app = App::new(view);
        if let Some(nick) = nickname {
            app.set_nickname(nick);
        }

        let socket = parley_client::connect(server_url, connect);

        Ok(Self { terminal, app, socket, socket_closed: false, refocus_at: None, refocus_delay })
    }

    /// Run the main event loop until the user quits.
    pub async fn run(mut self) -> Result<(), RuntimeError> {
        let actions = self.app.handle(AppEvent::Connecting);
        if self.process_actions(actions)? {
            return Ok(());
        }
        self.render()?;

        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(100));

        loop {
            let should_quit = tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event)?,
                    Some(Err(e)) => return Err(RuntimeError::Io(e)),
                    None => true,
                },

                // Transport lifecycle and service events
                maybe_event = self.socket.from_server.recv(), if !self.socket_closed => {
                    match maybe_event {
                        Some(event) => {
                            let actions = self.app.handle(translate(event));
                            self.process_actions(actions)?
                        },
                        // Supervisor exited (reconnect exhaustion); the app
                        // already rendered the terminal notice
                        None => {
                            self.socket_closed = true;
                            false
                        },
                    }
                },

                // Periodic tick: notice expiry and debounced refocus
                _ = tick.tick() => self.handle_tick()?,
            };

            if should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_tick(&mut self) -> Result<bool, RuntimeError> {
        let now = Instant::now();

        if self.refocus_at.is_some_and(|at| now >= at) {
            self.refocus_at = None;
            let actions = self.app.handle(AppEvent::FocusRegained);
            if self.process_actions(actions)? {
                return Ok(true);
            }
        }

        let actions = self.app.handle(AppEvent::Tick { now });
        self.process_actions(actions)
    }

    /// Handle a terminal event and return whether to quit.
    fn handle_terminal_event(&mut self, event: Event) -> Result<bool, RuntimeError> {
        let app_event = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match convert_key(key.code) {
                    Some(key_input) => AppEvent::Key(key_input),
                    None => return Ok(false),
                }
            },
            Event::Resize(cols, rows) => AppEvent::Resize(cols, rows),
            Event::FocusGained => {
                self.refocus_at = Some(Instant::now() + self.refocus_delay);
                return Ok(false);
            },
            _ => return Ok(false),
        };

        let actions = self.app.handle(app_event);
        self.process_actions(actions)
    }

    /// Execute actions from the app. Returns true if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, RuntimeError> {
        for action in actions {
            match action {
                AppAction::Render => self.render()?,
                AppAction::Quit => return Ok(true),
                AppAction::Send { message } => self.forward(ClientEvent::Message(message)),
                AppAction::RequestUserList => self.forward(ClientEvent::GetUsers),
            }
        }
        Ok(false)
    }

    /// Hand an event to the socket. Fire-and-forget: a full or closed
    /// channel drops the event, matching the no-queue delivery model.
    fn forward(&self, event: ClientEvent) {
        if let Err(e) = self.socket.to_server.try_send(event) {
            tracing::warn!(%e, "dropping outbound event");
        }
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.app);
        })?;
        Ok(())
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.socket.stop();

        let _ = disable_raw_mode();
        let _ = stdout().execute(DisableFocusChange);
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

/// Convert crossterm `KeyCode` to `KeyInput`.
fn convert_key(code: KeyCode) -> Option<KeyInput> {
    match code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

/// Map transport events onto the app's vocabulary.
fn translate(event: TransportEvent) -> AppEvent {
    match event {
        TransportEvent::Connected => AppEvent::Connected,
        TransportEvent::Disconnected { reason } => AppEvent::Disconnected { reason },
        TransportEvent::ReconnectAttempt { attempt } => AppEvent::ReconnectAttempt { attempt },
        TransportEvent::Reconnected => AppEvent::Reconnected,
        TransportEvent::ReconnectFailed => AppEvent::ReconnectFailed,
        TransportEvent::ConnectError { message } => {
            AppEvent::ConnectError { message: Some(message) }
        },
        TransportEvent::Event(server) => translate_server(server),
    }
}

fn translate_server(event: ServerEvent) -> AppEvent {
    match event {
        ServerEvent::Response(msg) => AppEvent::MessageReceived {
            username: msg.username,
            message: msg.message,
            timestamp: msg.timestamp,
        },
        ServerEvent::Status(status) => AppEvent::StatusReceived {
            msg: status.msg,
            user_count: status.user_count,
        },
        ServerEvent::UserList(list) => AppEvent::UserListReceived { users: list.users },
        ServerEvent::Error(error) => AppEvent::ServiceError { msg: error.msg },
    }
}

#[cfg(test)]
mod tests {
    use parley_proto::{ChatMessage, ServiceError, StatusNotice, UserList};

    use super::*;

    #[test]
    fn transport_lifecycle_maps_one_to_one() {
        assert!(matches!(translate(TransportEvent::Connected), AppEvent::Connected));
        assert!(matches!(
            translate(TransportEvent::ReconnectAttempt { attempt: 2 }),
            AppEvent::ReconnectAttempt { attempt: 2 }
        ));
        assert!(matches!(
            translate(TransportEvent::ReconnectFailed),
            AppEvent::ReconnectFailed
        ));
    }

    #[test]
    fn service_events_carry_their_payloads() {
        let event = translate(TransportEvent::Event(ServerEvent::Response(ChatMessage {
            message: "hi".into(),
            username: "mina".into(),
            timestamp: Some("12:00:00".into()),
        })));
        assert!(matches!(
            event,
            AppEvent::MessageReceived { username, message, timestamp: Some(_) }
                if username == "mina" && message == "hi"
        ));

        let event = translate(TransportEvent::Event(ServerEvent::Status(StatusNotice {
            msg: "joined".into(),
            user_count: Some(3),
        })));
        assert!(matches!(
            event,
            AppEvent::StatusReceived { user_count: Some(3), .. }
        ));

        let event = translate(TransportEvent::Event(ServerEvent::UserList(UserList {
            users: vec!["a".into()],
        })));
        assert!(matches!(event, AppEvent::UserListReceived { users } if users.len() == 1));

        let event = translate(TransportEvent::Event(ServerEvent::Error(ServiceError {
            msg: None,
        })));
        assert!(matches!(event, AppEvent::ServiceError { msg: None }));
    }
}
