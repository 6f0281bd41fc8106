//! Crawler module for scanning a site for social-media links
//!
//! This module contains the core crawling logic, including:
//! - Href extraction and link classification
//! - The content gate that admits only HTML pages
//! - Page fetching with retries for name resolution failures
//! - Frontier scheduling under a concurrency cap and a page budget
//! - Overall crawl coordination and lifecycle events

mod classifier;
mod coordinator;
mod events;
mod fetcher;
mod gate;
mod page;
mod parser;
mod scheduler;
mod session;

pub use classifier::{classify, Classified};
pub use coordinator::{
    fetch_with_retry, ScanOptions, Scanner, MAX_CONCURRENCY_LIMIT, MAX_FETCH_ATTEMPTS,
};
pub use events::{CrawlEvents, LoggingEvents, NoEvents, PageDecision};
pub use fetcher::{
    build_http_client, is_name_resolution_failure, FetchError, FetchErrorKind, FetchOptions,
    HttpPageFetcher, PageFetcher,
};
pub use gate::{accepts_response, evaluate_response, ContentProbe, HeadProbe, ProbeOutcome};
pub use page::{CrawlReport, Page};
pub use parser::extract_hrefs;
pub use scheduler::{Admission, Scheduler};
pub use session::Session;

use crate::config::Config;

/// Runs a complete crawl described by a configuration
///
/// This is the main entry point for the command line. It will:
/// 1. Build a scanner from the configuration
/// 2. Crawl the site, logging progress through `tracing`
/// 3. Return the report
///
/// # Arguments
///
/// * `config` - The scan configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(ScoutError)` - Crawl could not start
pub async fn crawl(config: &Config) -> crate::Result<CrawlReport> {
    Scanner::from_config(config)?.run(&LoggingEvents).await
}
