use std::env;
use std::fmt;
use std::time::Duration;

use nf_core::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com";
pub const DEFAULT_API_KEY: &str = "test";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Where the feed lives and how long a single request may take.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Defaults overridden by `NEWSFEED_BASE_URL`, `NEWSFEED_API_KEY`,
    /// `NEWSFEED_CONNECT_TIMEOUT_MS` and `NEWSFEED_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var("NEWSFEED_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(key) = env::var("NEWSFEED_API_KEY") {
            config.api_key = key;
        }
        if let Ok(ms) = env::var("NEWSFEED_CONNECT_TIMEOUT_MS") {
            config.connect_timeout = parse_millis("NEWSFEED_CONNECT_TIMEOUT_MS", &ms)?;
        }
        if let Ok(ms) = env::var("NEWSFEED_TIMEOUT_MS") {
            config.timeout = parse_millis("NEWSFEED_TIMEOUT_MS", &ms)?;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }
}

fn parse_millis(name: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| Error::Config(format!("{} must be a number of milliseconds: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://content.guardianapis.com");
        assert_eq!(config.api_key, "test");
        assert_eq!(config.connect_timeout, Duration::from_secs(15));
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ApiConfig::default().with_api_key("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_millis("X", " 250 ").unwrap(), Duration::from_millis(250));
        assert!(matches!(parse_millis("X", "soon"), Err(Error::Config(_))));
    }
}
