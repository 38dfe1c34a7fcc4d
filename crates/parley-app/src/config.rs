//! View configuration.

use std::time::Duration;

/// Tunable parameters for the chat view.
///
/// Deployments disagree on how much history to keep and how long notices
/// linger, so both are parameters rather than constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Maximum number of transcript entries kept. Oldest evicted first.
    pub max_entries: usize,

    /// How long a status notice stays visible before auto-hiding.
    pub notice_ttl: Duration,

    /// Debounce before refocusing the message field after the terminal
    /// regains focus.
    pub refocus_delay: Duration,
}

impl ViewConfig {
    /// Transcript bound of the default profile.
    pub const DEFAULT_MAX_ENTRIES: usize = 500;

    /// Transcript bound of the compact profile.
    pub const COMPACT_MAX_ENTRIES: usize = 100;

    /// Compact profile: a smaller transcript for constrained hosts.
    pub fn compact() -> Self {
        Self { max_entries: Self::COMPACT_MAX_ENTRIES, ..Self::default() }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_entries: Self::DEFAULT_MAX_ENTRIES,
            notice_ttl: Duration::from_secs(3),
            refocus_delay: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_profile_only_changes_bound() {
        let compact = ViewConfig::compact();

        assert_eq!(compact.max_entries, ViewConfig::COMPACT_MAX_ENTRIES);
        assert_eq!(compact.notice_ttl, ViewConfig::default().notice_ttl);
        assert_eq!(compact.refocus_delay, ViewConfig::default().refocus_delay);
    }
}
