//! Process configuration, resolved once at startup.

use std::time::Duration;

/// Default WAQI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.waqi.info";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default timeout for upstream requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable configuration shared by the upstream client and the listener.
///
/// # Example
///
/// ```
/// use airq::Config;
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_token("demo")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.port, 3000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// WAQI API token. An empty token is allowed and simply fails upstream.
    pub token: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Provider base URL, without trailing slash.
    pub base_url: String,
    /// Upper bound for one upstream request.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `AQICN_TOKEN` | WAQI API token | empty |
    /// | `PORT` | HTTP server port | 3000 |
    /// | `AQICN_BASE_URL` | Provider base URL | `https://api.waqi.info` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Used by [`Config::from_env`]; tests pass a closure over a map instead
    /// of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("AQICN_TOKEN").unwrap_or_default();

        let port = lookup("PORT")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&p: &u16| p != 0)
            .unwrap_or(DEFAULT_PORT);

        let base_url = lookup("AQICN_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::default()
            .with_token(token)
            .with_port(port)
            .with_base_url(base_url)
    }

    /// Set the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the provider base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the upstream request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
