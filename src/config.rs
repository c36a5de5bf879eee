//! Environment-driven sizing and timing for the whole system.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ACTOR_MAILBOX_ENV: &str = "FOODSHARE_ACTOR_MAILBOX";
pub const PRESENCE_MAILBOX_ENV: &str = "FOODSHARE_PRESENCE_MAILBOX";
pub const CHANNEL_BUFFER_ENV: &str = "FOODSHARE_CHANNEL_BUFFER";
pub const PUSH_TIMEOUT_MS_ENV: &str = "FOODSHARE_PUSH_TIMEOUT_MS";
pub const EVENT_CAPACITY_ENV: &str = "FOODSHARE_EVENT_CAPACITY";
pub const CATCH_UP_PAGE_ENV: &str = "FOODSHARE_CATCH_UP_PAGE";

/// Environment abstraction for configuration lookups.
///
/// Lets tests supply values without mutating the process environment.
pub trait ConfigEnv {
    fn string(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Sizing for every channel in the system.
///
/// ```
/// # use foodshare::config::SystemConfig;
/// # use std::time::Duration;
/// let config = SystemConfig::default();
/// assert_eq!(config.actor_mailbox, 64);
/// assert_eq!(config.push_timeout(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Mailbox of each store actor.
    pub actor_mailbox: usize,
    pub presence_mailbox: usize,
    /// Undelivered notifications a live channel may hold.
    pub channel_buffer: usize,
    pub push_timeout_ms: u64,
    /// Envelopes a slow event subscriber may fall behind before losing some.
    pub event_capacity: usize,
    pub catch_up_page: usize,
}

impl SystemConfig {
    const MAX_MAILBOX: usize = 65_536;
    const MAX_PUSH_TIMEOUT_MS: u64 = 10_000;
    const MAX_PAGE: usize = 1_000;

    pub fn from_env() -> Self {
        Self::from_env_with(&ProcessEnv)
    }

    /// Unset or unparsable values fall back to the default; the rest are clamped.
    pub fn from_env_with(env: &impl ConfigEnv) -> Self {
        let defaults = Self::default();
        Self {
            actor_mailbox: read(env, ACTOR_MAILBOX_ENV, defaults.actor_mailbox)
                .clamp(1, Self::MAX_MAILBOX),
            presence_mailbox: read(env, PRESENCE_MAILBOX_ENV, defaults.presence_mailbox)
                .clamp(1, Self::MAX_MAILBOX),
            channel_buffer: read(env, CHANNEL_BUFFER_ENV, defaults.channel_buffer)
                .clamp(1, Self::MAX_MAILBOX),
            push_timeout_ms: read(env, PUSH_TIMEOUT_MS_ENV, defaults.push_timeout_ms)
                .clamp(1, Self::MAX_PUSH_TIMEOUT_MS),
            event_capacity: read(env, EVENT_CAPACITY_ENV, defaults.event_capacity)
                .clamp(1, Self::MAX_MAILBOX),
            catch_up_page: read(env, CATCH_UP_PAGE_ENV, defaults.catch_up_page)
                .clamp(1, Self::MAX_PAGE),
        }
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}

fn read<T: std::str::FromStr>(env: &impl ConfigEnv, name: &str, default: T) -> T {
    env.string(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            actor_mailbox: 64,
            presence_mailbox: 64,
            channel_buffer: 32,
            push_timeout_ms: 250,
            event_capacity: 256,
            catch_up_page: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeEnv(HashMap<&'static str, &'static str>);

    impl ConfigEnv for FakeEnv {
        fn string(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    #[test]
    fn test_empty_env_gives_defaults() {
        let config = SystemConfig::from_env_with(&FakeEnv(HashMap::new()));
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_values_are_parsed_clamped_or_ignored() {
        let env = FakeEnv(HashMap::from([
            (ACTOR_MAILBOX_ENV, " 8 "),
            (PUSH_TIMEOUT_MS_ENV, "999999"),
            (CHANNEL_BUFFER_ENV, "0"),
            (CATCH_UP_PAGE_ENV, "lots"),
        ]));
        let config = SystemConfig::from_env_with(&env);
        assert_eq!(config.actor_mailbox, 8);
        assert_eq!(config.push_timeout_ms, 10_000);
        assert_eq!(config.channel_buffer, 1);
        assert_eq!(config.catch_up_page, 50);
    }

    #[test]
    fn test_partial_json_fills_in_defaults() {
        let config: SystemConfig = serde_json::from_str(r#"{"catch_up_page": 5}"#).unwrap();
        assert_eq!(config.catch_up_page, 5);
        assert_eq!(config.actor_mailbox, 64);
    }
}
