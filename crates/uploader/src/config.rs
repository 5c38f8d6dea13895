use std::env;
use std::time::Duration;

use haste_core::MAX_CHUNK_CHARS;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/4.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub max_chunk_chars: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: MAX_CHUNK_CHARS,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UploaderConfig {
    /// Defaults overridden by `HASTE_*` environment variables. Unparseable
    /// or zero values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_chunk_chars = lookup("HASTE_MAX_CHUNK_CHARS")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.max_chunk_chars);
        let connect_timeout = lookup("HASTE_CONNECT_TIMEOUT_SECONDS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout);
        let request_timeout = lookup("HASTE_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let user_agent = lookup("HASTE_USER_AGENT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.user_agent);

        Self {
            max_chunk_chars,
            connect_timeout,
            request_timeout,
            user_agent,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars.max(1);
        self
    }

    /// Timeouts to hand to the HTTP client. A zero duration would expire every
    /// request at once, so it is replaced by the default.
    pub fn effective_timeouts(&self) -> (Duration, Duration) {
        let defaults = Self::default();
        let pick = |value: Duration, default: Duration| {
            if value.is_zero() {
                default
            } else {
                value
            }
        };

        (
            pick(self.connect_timeout, defaults.connect_timeout),
            pick(self.request_timeout, defaults.request_timeout),
        )
    }
}
