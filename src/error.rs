//! Error types and result handling for MangaDraft operations.
//!
//! Every public operation returns a [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Failures are terminal for the operation that
//! produced them: nothing is retried here beyond the transport's own retry count.
//!
//! # Error Categories
//!
//! - **HTTP status errors**: [`NotFound`](Error::NotFound),
//!   [`Unauthorized`](Error::Unauthorized),
//!   [`ServiceUnavailable`](Error::ServiceUnavailable) and
//!   [`UnknownStatus`](Error::UnknownStatus)
//! - **Embedded data errors**: the `window.project_data` blob is missing,
//!   malformed, or shaped unexpectedly
//! - **Upstream JSON errors**: an API endpoint answered with something that is not JSON
//! - **Unsupported requests**: a search with neither a title nor a tag
//! - **Network errors**: the transport gave up
//!
//! Each message embeds the purpose label handed in by the caller, so it is
//! always clear which network call failed.
//!
//! # Examples
//!
//! ```rust
//! use mangadraft::error::{Error, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(Error::not_found(r#"Loading summary page of id "abc" - getMangaDetails"#))
//! }
//!
//! match lookup() {
//!     Err(Error::NotFound { purpose }) => assert!(purpose.contains("abc")),
//!     _ => unreachable!(),
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Type alias for Results with MangaDraft errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all MangaDraft operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from the HTTP client, after retries were exhausted.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP 404. Expected when a manga or chapter id does not exist.
    #[error("HTTP 404 Not Found [{purpose}]")]
    NotFound { purpose: String },

    /// HTTP 403. Never expected from the site, so worth reporting.
    #[error("HTTP 403 Unauthorized - Please report if you see this [{purpose}]")]
    Unauthorized { purpose: String },

    /// HTTP 503. Usually transient, but still worth reporting.
    #[error("HTTP 503 Service Temporarily Unavailable - Please report if you see this [{purpose}]")]
    ServiceUnavailable { purpose: String },

    /// Any other non-200 status.
    #[error("HTTP {status} Unknown Error [{purpose}]")]
    UnknownStatus { status: u16, purpose: String },

    /// The JSON blob embedded in an HTML page is missing, unparsable, or shaped unexpectedly.
    #[error("{issue} (\"{variable}\") [{purpose}]")]
    MalformedEmbeddedData {
        variable: String,
        purpose: String,
        issue: EmbeddedDataIssue,
    },

    /// An API endpoint answered 200 with a body that is not the expected JSON.
    #[error("Response is not valid JSON: {reason} [{purpose}]")]
    MalformedUpstreamJson { purpose: String, reason: String },

    /// A search request that the upstream API cannot express.
    #[error("Unsupported search request: {0}")]
    UnsupportedRequest(String),

    /// Data parsing errors outside the embedded blob, e.g. a non-numeric chapter id.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What exactly went wrong while pulling a JSON object out of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedDataIssue {
    /// The variable name does not occur in the page at all.
    DeclarationNotFound,

    /// The variable occurs, but never as `name = {...}`.
    MalformedAssignment,

    /// The object was found but is not valid JSON.
    InvalidJson(String),

    /// The object parsed, but its content does not fit the expected shape.
    UnexpectedStructure(String),
}

impl fmt::Display for EmbeddedDataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclarationNotFound => write!(f, "Could not find declaration in page body"),
            Self::MalformedAssignment => write!(f, "Declaration is not an object assignment"),
            Self::InvalidJson(reason) => write!(
                f,
                "Body is not valid JSON - Please report if you see this: {}",
                reason
            ),
            Self::UnexpectedStructure(reason) => write!(
                f,
                "Body has an unexpected structure - Please report if you see this: {}",
                reason
            ),
        }
    }
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a 404 error for the given purpose label.
    pub fn not_found(purpose: impl Into<String>) -> Self {
        Error::NotFound {
            purpose: purpose.into(),
        }
    }

    /// Creates an embedded data error for `variable`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mangadraft::error::{EmbeddedDataIssue, Error};
    ///
    /// let error = Error::embedded(
    ///     "window.project_data",
    ///     "Loading summary page",
    ///     EmbeddedDataIssue::DeclarationNotFound,
    /// );
    /// assert!(error.to_string().contains("[Loading summary page]"));
    /// ```
    pub fn embedded(
        variable: impl Into<String>,
        purpose: impl Into<String>,
        issue: EmbeddedDataIssue,
    ) -> Self {
        Error::MalformedEmbeddedData {
            variable: variable.into(),
            purpose: purpose.into(),
            issue,
        }
    }

    /// Creates an upstream JSON error for the given purpose label.
    pub fn malformed_json(purpose: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedUpstreamJson {
            purpose: purpose.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for failures that point at an upstream change or an
    /// outage rather than bad input, and should be reported.
    pub fn is_reportable(&self) -> bool {
        match self {
            Error::Unauthorized { .. } | Error::ServiceUnavailable { .. } => true,
            Error::MalformedEmbeddedData { issue, .. } => matches!(
                issue,
                EmbeddedDataIssue::InvalidJson(_) | EmbeddedDataIssue::UnexpectedStructure(_)
            ),
            _ => false,
        }
    }

    /// Returns the purpose label carried by the error, if any.
    pub fn purpose(&self) -> Option<&str> {
        match self {
            Error::NotFound { purpose }
            | Error::Unauthorized { purpose }
            | Error::ServiceUnavailable { purpose }
            | Error::UnknownStatus { purpose, .. }
            | Error::MalformedEmbeddedData { purpose, .. }
            | Error::MalformedUpstreamJson { purpose, .. } => Some(purpose),
            _ => None,
        }
    }
}
