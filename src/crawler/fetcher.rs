//! Page fetching
//!
//! This module defines the page fetcher contract used by the scanner and
//! ships the default HTTP implementation:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests that return the raw hrefs of a page
//! - Error classification (name resolution failures are retryable)

use crate::config::UserAgentConfig;
use crate::crawler::parser::extract_hrefs;
use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Longest time allowed for establishing a connection
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Lowercase fragments that identify a failed DNS lookup in an error chain
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "nodename nor servname",
    "temporary failure in name resolution",
];

/// Classification of a failed page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The host name could not be resolved (retryable)
    NameResolution,

    /// The server answered with a non-success status code
    Status(u16),

    /// The request timed out
    Timeout,

    /// The connection could not be established
    Connect,

    /// The response body could not be read
    Body,

    /// Anything else
    Other,
}

impl FetchErrorKind {
    /// Returns true if a fetch failing with this kind may be attempted again
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NameResolution)
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameResolution => write!(f, "name resolution failure"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "timeout"),
            Self::Connect => write!(f, "connection failure"),
            Self::Body => write!(f, "unreadable body"),
            Self::Other => write!(f, "request failure"),
        }
    }
}

/// Error returned by a [`PageFetcher`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    /// What went wrong
    pub kind: FetchErrorKind,

    /// Human-readable cause
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if the fetch may be attempted again
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if is_name_resolution_failure(&error) {
            FetchErrorKind::NameResolution
        } else if error.is_timeout() {
            FetchErrorKind::Timeout
        } else if error.is_connect() {
            FetchErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            FetchErrorKind::Body
        } else if let Some(status) = error.status() {
            FetchErrorKind::Status(status.as_u16())
        } else {
            FetchErrorKind::Other
        };

        Self::new(kind, error.to_string())
    }
}

/// Returns true if any error in the chain reports a failed DNS lookup
pub fn is_name_resolution_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);

    while let Some(err) = current {
        let text = err.to_string().to_lowercase();
        if NAME_RESOLUTION_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
        {
            return true;
        }
        current = err.source();
    }

    false
}

/// Options forwarded untouched from the scan configuration to the fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Do not load resources referenced by the page (scripts, frames, ...)
    pub skip_external_resources: bool,
}

/// Retrieves a page and returns its raw hrefs
///
/// Implementations must return every `href` of an anchor and every
/// `data-href` value found on the page, in document order, including
/// duplicates. Deduplication is the classifier's job.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page at `url`
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] whose kind decides whether the scanner retries.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Vec<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Upper bound for a whole request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use medium_scout::config::UserAgentConfig;
/// use medium_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default [`PageFetcher`] that downloads pages over HTTP
///
/// The page is not rendered and no script runs; hrefs are read from the
/// served markup only.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Vec<String>, FetchError> {
        tracing::trace!(
            "GET {} (skip external resources: {})",
            url,
            options.skip_external_resources
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::new(
                FetchErrorKind::Status(status.as_u16()),
                format!("{} returned {}", url, status),
            ));
        }

        let body = response.text().await?;
        Ok(extract_hrefs(&body))
    }
}
