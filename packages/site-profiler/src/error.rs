//! Typed errors for the profiler library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! bad request apart from a broken pipeline.

use thiserror::Error;

/// Errors surfaced by a profile request.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The request itself was malformed (missing or unparseable URL)
    #[error("{reason}")]
    InvalidInput { reason: String },

    /// The seed page could not be fetched after all retries
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] FetchError),

    /// Anything else that went wrong inside the pipeline
    #[error("Scraping failed: {0}")]
    Internal(String),
}

impl ProfileError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether the caller is at fault (400) rather than the service (500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::Fetch(_))
    }
}

/// Errors that can occur while retrieving a page over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-2xx status after redirects
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Request exceeded its timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// URL rejected by the SSRF guard
    #[error("blocked URL: {0}")]
    Blocked(#[from] SecurityError),
}

impl FetchError {
    /// Network, timeout and status failures are worth another attempt;
    /// malformed or blocked URLs never are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Timeout { .. }
        )
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http(Box::new(err))
        }
    }
}

/// Errors from a headless render. Always non-fatal to the pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No rendering backend is configured or the probe failed
    #[error("renderer unavailable")]
    Unavailable,

    /// Navigation or settle exceeded the render timeout
    #[error("render timed out for {url}")]
    Timeout { url: String },

    /// Browser process could not be launched or exited badly
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Remote rendering service rejected the request
    #[error("render API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure talking to a remote renderer
    #[error("render network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Network(err.to_string())
    }
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, metadata services)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for profile requests.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for render operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
