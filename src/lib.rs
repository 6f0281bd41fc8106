//! Medium-Scout: a social-media link finder
//!
//! This crate crawls a website from one entry URL, follows same-domain links up
//! to a page budget, and reports every outbound link that matches a known or
//! fuzzy-matched social-media prefix.

pub mod config;
pub mod crawler;
pub mod media;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Medium-Scout operations
///
/// These errors are fatal: the crawl either never starts or stops immediately.
/// Per-page failures are reported through [`CrawlError`] instead.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL '{url}': expected (http|https)://(domain)/(optional path)")]
    InvalidUrl { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Non-fatal, per-page errors delivered through `CrawlEvents::page_error`
///
/// None of these stop the crawl. Each one is reported exactly once.
#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    /// The content probe refused the URL; it is now permanently blocked
    #[error("Content rejected for {url}: {reason}")]
    ContentRejected { url: String, reason: String },

    /// The page could not be retrieved; it is recorded with empty results
    #[error("Error retrieving {url} after {attempts} attempt(s): {source}")]
    FetchTerminal {
        url: String,
        attempts: u32,
        #[source]
        source: crawler::FetchError,
    },

    /// Fetching or classifying the page panicked; the page is still recorded
    #[error("Error scanning {url}: {message}")]
    Classification { url: String, message: String },
}

impl CrawlError {
    /// Returns the URL this error belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::ContentRejected { url, .. }
            | Self::FetchTerminal { url, .. }
            | Self::Classification { url, .. } => url,
        }
    }
}

/// Result type alias for Medium-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEvents, CrawlReport, Page, PageDecision, ScanOptions, Scanner};
pub use media::{MediumList, MediumMatcher};
pub use state::{CrawlPhase, VisitState};
pub use url::{is_valid_url, normalize_href, resolve, ResolvedLink};
