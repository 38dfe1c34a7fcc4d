//! Input fields
//!
//! Displays the nickname and message fields side by side, with the cursor
//! placed in whichever one has focus.

use parley_app::{App, Focus, InputState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

const NICKNAME_WIDTH: u16 = 26;
const MESSAGE_MIN_WIDTH: u16 = 20;
const BORDER_SIZE: u16 = 2;

/// Render both input fields.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NICKNAME_WIDTH), Constraint::Min(MESSAGE_MIN_WIDTH)])
        .split(area);

    let [nickname_area, message_area] = chunks.as_ref() else {
        return;
    };

    render_field(
        frame,
        app.nickname_input(),
        *nickname_area,
        " Nickname ",
        border_style(app, Focus::Nickname),
        app.focus() == Focus::Nickname,
    );
    render_field(
        frame,
        app.message_input(),
        *message_area,
        " Message ",
        border_style(app, Focus::Message),
        app.focus() == Focus::Message,
    );
}

fn border_style(app: &App, field: Focus) -> Style {
    if app.focus() == field {
        Style::default().fg(Color::Yellow)
    } else if field == Focus::Nickname && app.nickname_explicit() {
        // Green border marks a deliberately chosen nickname
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_field(
    frame: &mut Frame,
    input: &InputState,
    area: Rect,
    title: &'static str,
    border: Style,
    focused: bool,
) {
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border);
    let paragraph = Paragraph::new(input.buffer().to_string())
        .style(Style::default().fg(Color::White))
        .block(block);

    frame.render_widget(paragraph, area);

    if focused {
        let inner_width = area.width.saturating_sub(BORDER_SIZE);
        let cursor_offset = (input.cursor() as u16).min(inner_width.saturating_sub(1));
        let cursor_x = area.x.saturating_add(1).saturating_add(cursor_offset);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
