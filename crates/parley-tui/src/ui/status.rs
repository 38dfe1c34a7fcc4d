//! Status bar
//!
//! Displays the connection indicator, the online count, and the committed
//! identity.

use parley_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection = match app.connection_state() {
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Reconnecting { attempt } => Span::styled(
            format!("Reconnecting (attempt {attempt})"),
            Style::default().fg(Color::Yellow),
        ),
        ConnectionState::ReconnectFailed => Span::styled(
            "Offline - restart to reconnect",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let mut extras = String::new();
    if !app.users().is_empty() {
        extras.push_str(&format!(" | {} online", app.users().len()));
    }
    if !app.nickname().is_empty() {
        extras.push_str(&format!(" | you: {}", app.nickname()));
    }

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection,
        Span::styled(extras, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
