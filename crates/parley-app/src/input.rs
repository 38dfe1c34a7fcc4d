//! Terminal-agnostic keyboard input and text-field editing.
//!
//! [`KeyInput`] decouples the application from terminal libraries
//! (crossterm, termion, etc.), enabling deterministic tests. [`InputState`]
//! owns one text field's buffer and cursor; the [`crate::App`] owns two of
//! them (message and nickname) plus the [`Focus`] selector.

/// Keyboard input abstraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Tab key (switch fields).
    Tab,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
}

/// Which input field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The message draft field.
    #[default]
    Message,
    /// The nickname field.
    Nickname,
}

/// State of a single-line text field.
///
/// Manages the text buffer and cursor position. Cursor positions are char
/// indices, not byte offsets.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the field.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the field content, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.chars().count();
    }

    /// Clear the field.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns true if the field changed (content or
    /// cursor); Enter, Tab, and Esc are not editing keys and return false.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.byte_offset(self.cursor), c);
                self.cursor = self.cursor.saturating_add(1);
                true
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    self.buffer.remove(self.byte_offset(self.cursor));
                }
                true
            },
            KeyInput::Delete => {
                if self.cursor < self.char_len() {
                    self.buffer.remove(self.byte_offset(self.cursor));
                }
                true
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            },
            KeyInput::Right => {
                if self.cursor < self.char_len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                true
            },
            KeyInput::Home => {
                self.cursor = 0;
                true
            },
            KeyInput::End => {
                self.cursor = self.char_len();
                true
            },
            KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down => false,
        }
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map_or(self.buffer.len(), |(offset, _)| offset)
    }
}
