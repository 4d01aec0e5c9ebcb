//! Network utilities: the transport seam, rate limiting, and response validation.
//!
//! The source never talks to reqwest directly. It goes through the
//! [`Transport`] trait, which the host (or a test) can implement however it
//! likes. [`HttpClient`] is the stock implementation, with per-source rate
//! limiting and a fixed retry count.
//!
//! - [`html`]: locating inline script bodies in a page
//! - [`json`]: parsing API bodies and objects embedded in script text
//!
//! # Examples
//!
//! ```rust,no_run
//! use mangadraft::config::SourceConfig;
//! use mangadraft::net::{validate_response, HttpClient, Request, Transport};
//!
//! # async fn example() -> mangadraft::Result<()> {
//! let client = HttpClient::from_config("mangadraft", &SourceConfig::default())?;
//!
//! let response = client
//!     .fetch(Request::get("https://mangadraft.com/manga/abc/summary"))
//!     .await?;
//! let html = validate_response(response, "Loading summary page")?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::{
    Client, ClientBuilder,
    header::{REFERER, USER_AGENT},
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::{
    config::SourceConfig,
    error::{Error, Result},
};

pub mod html;
pub mod json;

/// An outbound GET request.
///
/// The `Referer` header defaults to the request URL itself; some endpoints
/// want the page that would have issued the call instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    referer: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            referer: None,
        }
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// The `Referer` value to send with this request.
    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or(&self.url)
    }
}

/// A completed HTTP exchange: status and body, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The HTTP capability the source depends on.
///
/// Implementations own rate limiting, retries and the default user agent.
/// A non-200 status is not an error at this level: it is handed back as a
/// [`Response`] so that [`validate_response`] can label it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response>;
}

/// Maps a completed response to its body, or to a labeled failure.
///
/// # Examples
///
/// ```rust
/// use mangadraft::net::{validate_response, Response};
/// use mangadraft::Error;
///
/// let body = validate_response(Response::new(200, "<html/>"), "loading").unwrap();
/// assert_eq!(body, "<html/>");
///
/// let error = validate_response(Response::new(404, ""), "loading").unwrap_err();
/// assert!(matches!(error, Error::NotFound { .. }));
/// ```
pub fn validate_response(response: Response, purpose: &str) -> Result<String> {
    let purpose = purpose.to_string();
    let error = match response.status {
        200 => return Ok(response.body),
        403 => Error::Unauthorized { purpose },
        404 => Error::NotFound { purpose },
        503 => Error::ServiceUnavailable { purpose },
        status => Error::UnknownStatus { status, purpose },
    };

    if error.is_reportable() {
        tracing::error!("{}", error);
    } else {
        tracing::debug!("{}", error);
    }
    Err(error)
}

/// Per-source rate limiter to prevent overwhelming the website.
///
/// Tracks the last request time for each source and enforces a minimum delay
/// between requests.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<HashMap<String, Instant>>,
    default_delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: self.default_delay,
        }
    }
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified minimum delay in milliseconds.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits if necessary before allowing a request for the specified source.
    pub async fn wait(&self, source_id: &str) {
        let now = Instant::now();
        let wait_duration = {
            let last_map = self.last_request.lock();
            last_map
                .get(source_id)
                .map(|&last| now.duration_since(last))
                .filter(|&elapsed| elapsed < self.default_delay)
                .map(|elapsed| self.default_delay - elapsed)
        };

        if let Some(duration) = wait_duration {
            tokio::time::sleep(duration).await;
        }

        self.last_request
            .lock()
            .insert(source_id.to_string(), Instant::now());
    }
}

fn client_builder(timeout_secs: u64) -> ClientBuilder {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
}

/// Shared client for [`HttpClient::new`], built with the default timeout and
/// compression settings.
static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(|| {
    client_builder(SourceConfig::default().timeout_secs)
        .build()
        .expect("Failed to build HTTP client")
});

/// reqwest-backed [`Transport`] with rate limiting and retry logic.
///
/// Every request carries the configured `User-Agent` and a `Referer` header.
/// Connection failures and `429 Too Many Requests` are retried up to
/// `max_retries` times; every other status is returned as-is.
///
/// ```rust
/// use mangadraft::net::HttpClient;
///
/// let client = HttpClient::new("mangadraft")
///     .with_rate_limit(1000)
///     .with_max_retries(2);
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    source_id: String,
    client: Client,
    rate_limiter: RateLimiter,
    max_retries: u32,
    user_agent: String,
}

impl HttpClient {
    /// Creates a client with the default configuration.
    pub fn new(source_id: impl Into<String>) -> Self {
        let config = SourceConfig::default();
        Self {
            source_id: source_id.into(),
            client: DEFAULT_CLIENT.clone(),
            rate_limiter: RateLimiter::new(config.rate_limit_delay_ms()),
            max_retries: config.max_retries,
            user_agent: config.user_agent,
        }
    }

    /// Creates a client honoring every field of `config`.
    pub fn from_config(source_id: impl Into<String>, config: &SourceConfig) -> Result<Self> {
        let client = client_builder(config.timeout_secs).build()?;

        Ok(Self {
            source_id: source_id.into(),
            client,
            rate_limiter: RateLimiter::new(config.rate_limit_delay_ms()),
            max_retries: config.max_retries,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Sets the rate limit delay for this client.
    pub fn with_rate_limit(mut self, delay_ms: u64) -> Self {
        self.rate_limiter = RateLimiter::new(delay_ms);
        self
    }

    /// Sets the maximum number of retries for failed requests.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Replaces the default `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, request: Request) -> Result<Response> {
        let mut attempts = 0;

        loop {
            self.rate_limiter.wait(&self.source_id).await;
            tracing::debug!(url = %request.url, attempt = attempts + 1, "GET");

            let sent = self
                .client
                .get(&request.url)
                .header(REFERER, request.referer())
                .header(USER_AGENT, &self.user_agent)
                .send()
                .await;

            match sent {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if status == 429 && attempts < self.max_retries {
                        attempts += 1;
                        let delay = Duration::from_secs(2_u64.pow(attempts));
                        tracing::warn!(
                            url = %request.url,
                            "rate limited by {}, retrying in {:?}",
                            self.source_id,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let body = response.text().await?;
                    return Ok(Response { status, body });
                }
                Err(e) => {
                    if attempts < self.max_retries {
                        attempts += 1;
                        tracing::warn!(url = %request.url, "request failed ({}), retrying", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}
