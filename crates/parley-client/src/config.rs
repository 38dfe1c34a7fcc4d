//! Connection policy.

use std::time::Duration;

/// Reconnection and timeout policy for the chat socket.
///
/// Defaults mirror common deployments: half-second initial backoff doubling
/// to a five-second ceiling, five attempts, twenty-second dial timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Reconnect automatically after a connection loss.
    pub reconnect: bool,

    /// Backoff before the first reconnect attempt.
    pub initial_delay: Duration,

    /// Backoff ceiling.
    pub max_delay: Duration,

    /// Reconnect attempts before giving up.
    pub max_attempts: u32,

    /// How long a single dial may take before it counts as failed.
    pub connect_timeout: Duration,
}

impl ConnectConfig {
    /// Backoff before the given 1-based reconnect attempt: doubles from
    /// `initial_delay`, capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let factor = 1u32 << exponent;
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            reconnect: true,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            max_attempts: 5,
            connect_timeout: Duration::from_secs(20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_the_ceiling() {
        let config = ConnectConfig::default();

        assert_eq!(config.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(2), Duration::from_secs(1));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(2));
        assert_eq!(config.backoff_delay(4), Duration::from_secs(4));
        assert_eq!(config.backoff_delay(5), Duration::from_secs(5));
        assert_eq!(config.backoff_delay(6), Duration::from_secs(5));
    }

    #[test]
    fn backoff_survives_absurd_attempt_counts() {
        let config = ConnectConfig::default();

        assert_eq!(config.backoff_delay(u32::MAX), config.max_delay);
    }

    #[test]
    fn defaults_match_deployment_profile() {
        let config = ConnectConfig::default();

        assert!(config.reconnect);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.connect_timeout, Duration::from_secs(20));
    }
}
