//! Transcript pane
//!
//! Displays the bounded message log with the newest entries kept in view.

use parley_app::{App, LogEntry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the transcript pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Chat ");

    let mut items: Vec<ListItem> =
        app.transcript().visible().map(|entry| ListItem::new(entry_line(entry))).collect();

    if items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        ))));
    }

    // Keep-latest-visible: drop rows that would scroll past the top
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn entry_line(entry: &LogEntry) -> Line<'static> {
    match entry {
        LogEntry::Chat(line) => {
            let mut spans = vec![
                Span::styled(
                    format!("<{}>", line.username),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(line.body.clone()),
            ];
            if let Some(timestamp) = &line.timestamp {
                spans.push(Span::styled(
                    format!("  [{timestamp}]"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        },
        LogEntry::Notice(notice) => {
            let text = match notice.user_count {
                Some(count) => format!("{} ({count} online)", notice.text),
                None => notice.text.clone(),
            };
            Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
            .centered()
        },
    }
}
