use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:9090";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Where the stats service lives and how long to wait for it
#[derive(Clone, Debug)]
pub struct StatsClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl StatsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for StatsClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

/// Environment variables:
/// - `STATS_SERVER_URL` (default: http://localhost:9090)
/// - `STATS_CLIENT_TIMEOUT_SECS` (default: 5)
impl FromEnv for StatsClientConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or_default("STATS_SERVER_URL", DEFAULT_SERVER_URL);
        let timeout_secs = env_parse_or("STATS_CLIENT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs)))
    }
}
