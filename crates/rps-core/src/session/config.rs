//! Session configuration from the environment.

use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "https://rockpaperscissorbackend.onrender.com";
pub const DEFAULT_LEADERBOARD_URL: &str = "http://10.0.103.145:5000";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Tunables for one session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the referee backend (`POST /play`)
    pub backend_url: String,
    /// Base URL of the leaderboard (`GET`/`POST /leaderboard`)
    pub leaderboard_url: String,
    /// Trailing-edge debounce window for move submissions
    pub debounce: Duration,
    /// Per-request timeout for outbound HTTP calls
    pub http_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            leaderboard_url: DEFAULT_LEADERBOARD_URL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }
}

impl SessionConfig {
    /// Read `RPS_BACKEND_URL`, `RPS_LEADERBOARD_URL`, `RPS_DEBOUNCE_MS`
    /// and `RPS_HTTP_TIMEOUT_MS`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            backend_url: lookup("RPS_BACKEND_URL").unwrap_or(defaults.backend_url),
            leaderboard_url: lookup("RPS_LEADERBOARD_URL").unwrap_or(defaults.leaderboard_url),
            debounce: millis("RPS_DEBOUNCE_MS", defaults.debounce),
            http_timeout: millis("RPS_HTTP_TIMEOUT_MS", defaults.http_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = SessionConfig::from_lookup(|_| None);
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("RPS_BACKEND_URL", "http://localhost:8000"),
            ("RPS_DEBOUNCE_MS", "250"),
            ("RPS_HTTP_TIMEOUT_MS", "soon"),
        ]);
        let config = SessionConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.leaderboard_url, DEFAULT_LEADERBOARD_URL);
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.http_timeout, Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS));
    }
}
