//! Outbound message validation and construction.
//!
//! The composer turns the raw draft and nickname fields into a wire-ready
//! [`ChatMessage`]: trims and bounds the text, resolves the display name,
//! and stamps a localized send time.

use parley_proto::ChatMessage;
use rand::Rng;
use thiserror::Error;

/// Maximum chat message length in characters, after trimming.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Maximum nickname length in characters.
pub const MAX_NICKNAME_CHARS: usize = 20;

/// Prefix of synthesized guest nicknames.
pub const GUEST_PREFIX: &str = "user";

const GUEST_SUFFIX_LEN: usize = 4;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Why a draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Trimmed draft was empty; nothing to send.
    #[error("message is empty")]
    Empty,

    /// Trimmed draft exceeded [`MAX_MESSAGE_CHARS`].
    #[error("message too long: {len} characters (max {MAX_MESSAGE_CHARS})")]
    TooLong {
        /// Character count of the trimmed draft.
        len: usize,
    },
}

/// Validate a draft and build the outbound `message` payload.
///
/// The draft is trimmed; empty and over-length drafts are rejected. The
/// nickname resolves per [`resolve_nickname`] and the timestamp is stamped
/// at call time.
pub fn compose(draft: &str, nickname: &str) -> Result<ChatMessage, ComposeError> {
    let text = draft.trim();
    if text.is_empty() {
        return Err(ComposeError::Empty);
    }

    let len = text.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ComposeError::TooLong { len });
    }

    Ok(ChatMessage {
        message: text.to_string(),
        username: resolve_nickname(nickname),
        timestamp: Some(local_timestamp()),
    })
}

/// Resolve the nickname to send with.
///
/// A non-empty trimmed value is truncated to [`MAX_NICKNAME_CHARS`]; an
/// empty one yields a fresh guest identifier. Resolution is randomized per
/// empty-input call on purpose: anonymous senders get a new identity each
/// time rather than a prompt.
pub fn resolve_nickname(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        guest_nickname()
    } else {
        trimmed.chars().take(MAX_NICKNAME_CHARS).collect()
    }
}

/// Synthesize a guest nickname: [`GUEST_PREFIX`] plus four random base-36
/// characters.
pub fn guest_nickname() -> String {
    let mut rng = rand::rng();
    let mut name = String::with_capacity(GUEST_PREFIX.len() + GUEST_SUFFIX_LEN);
    name.push_str(GUEST_PREFIX);
    for _ in 0..GUEST_SUFFIX_LEN {
        let idx = rng.random_range(0..BASE36.len());
        name.push(BASE36[idx] as char);
    }
    name
}

/// Wall-clock send time, formatted for local display.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
