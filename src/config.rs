//! Runtime configuration for the MangaDraft source.
//!
//! The defaults match what the site tolerates: five requests per second and
//! five attempts per request. Hosts that keep settings on disk can deserialize
//! a [`SourceConfig`] directly; missing fields fall back to the defaults.
//!
//! ```rust
//! use mangadraft::config::SourceConfig;
//!
//! let config = SourceConfig::default()
//!     .with_requests_per_second(2)
//!     .with_max_retries(3);
//!
//! assert_eq!(config.base_url, "https://mangadraft.com");
//! assert_eq!(config.rate_limit_delay_ms(), 500);
//! ```

use serde::{Deserialize, Serialize};

/// Root URL of the site, without a trailing slash.
pub const BASE_DOMAIN: &str = "https://mangadraft.com";

/// User agent sent when the host does not supply one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root used to build every request URL
    pub base_url: String,

    /// Upper bound on outbound requests per second
    pub requests_per_second: u32,

    /// Attempts made for a request before its failure becomes terminal
    pub max_retries: u32,

    /// Default `User-Agent` header
    pub user_agent: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_DOMAIN.to_string(),
            requests_per_second: 5,
            max_retries: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_requests_per_second(mut self, requests: u32) -> Self {
        self.requests_per_second = requests;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Minimum delay between two requests, derived from `requests_per_second`.
    ///
    /// Zero requests per second disables the limiter.
    pub fn rate_limit_delay_ms(&self) -> u64 {
        match self.requests_per_second {
            0 => 0,
            n => 1000 / u64::from(n),
        }
    }
}
