//! Observable view state types.
//!
//! This module defines the data structures that represent the view's
//! current picture of the world: the [`ConnectionState`] driving the
//! status indicator and the [`Transcript`], a bounded log of rendered
//! entries.
//!
//! Everything that enters the transcript passes through [`sanitize`], so a
//! renderer can paint entry text verbatim without re-checking it.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Connection state driving the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial connection in progress.
    Connecting,
    /// Live session established.
    Connected,
    /// Connection lost; reconnection pending.
    Disconnected,
    /// Reconnect attempt in flight.
    Reconnecting {
        /// 1-based attempt count.
        attempt: u32,
    },
    /// Every reconnect attempt exhausted. Terminal; only restarting the
    /// client recovers.
    ReconnectFailed,
}

impl ConnectionState {
    /// True once reconnection has been abandoned.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ReconnectFailed)
    }
}

/// A chat line from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Sender's display name.
    pub username: String,
    /// Message body.
    pub body: String,
    /// Sender-local time string, when provided.
    pub timestamp: Option<String>,
}

/// A system notice shown inline in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeLine {
    /// Notice text.
    pub text: String,
    /// Live user count suffix, when the service provided one.
    pub user_count: Option<u64>,
    /// When the notice was posted. Drives auto-hide.
    pub posted_at: Instant,
    /// True once the notice TTL elapsed. Hidden entries stay in the log
    /// (they still count toward the bound) but are not rendered.
    pub hidden: bool,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// User chat message.
    Chat(ChatLine),
    /// System status notice.
    Notice(NoticeLine),
}

impl LogEntry {
    /// True if a renderer should paint this entry.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Chat(_) => true,
            Self::Notice(notice) => !notice.hidden,
        }
    }
}

/// Bounded, ordered message log.
///
/// Holds at most `max` entries; inserting beyond the bound evicts the
/// oldest entries first. The bound holds after every insertion.
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: VecDeque<LogEntry>,
    max: usize,
}

impl Transcript {
    /// Create an empty transcript bounded at `max` entries.
    pub fn new(max: usize) -> Self {
        Self { entries: VecDeque::with_capacity(max.min(64)), max }
    }

    /// Append a chat line. All fields are sanitized.
    pub fn push_chat(&mut self, username: &str, body: &str, timestamp: Option<&str>) {
        self.push(LogEntry::Chat(ChatLine {
            username: sanitize(username),
            body: sanitize(body),
            timestamp: timestamp.map(sanitize),
        }));
    }

    /// Append a status notice posted at `now`.
    pub fn push_notice(&mut self, text: &str, user_count: Option<u64>, now: Instant) {
        self.push(LogEntry::Notice(NoticeLine {
            text: sanitize(text),
            user_count,
            posted_at: now,
            hidden: false,
        }));
    }

    /// Hide notices older than `ttl`. Returns true if anything changed.
    ///
    /// Best-effort: a notice already evicted by the bound is simply gone.
    pub fn expire_notices(&mut self, now: Instant, ttl: Duration) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            if let LogEntry::Notice(notice) = entry
                && !notice.hidden
                && now.saturating_duration_since(notice.posted_at) >= ttl
            {
                notice.hidden = true;
                changed = true;
            }
        }
        changed
    }

    /// Number of entries, hidden notices included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries have been appended (or all were evicted).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries a renderer should paint, in insertion order.
    pub fn visible(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|entry| entry.is_visible())
    }

    fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max {
            let evicted = self.entries.pop_front();
            tracing::trace!(?evicted, "transcript bound reached, evicting oldest entry");
        }
    }
}

/// Strip control characters from service-supplied text.
///
/// Terminal cells render text literally, so the remaining injection
/// surface is control bytes: escape sequences, carriage returns, cursor
/// movement. Whitespace controls collapse to a single space; everything
/// else is dropped.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
