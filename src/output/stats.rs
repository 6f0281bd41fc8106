//! Statistics generation from crawl reports
//!
//! This module provides functionality for summarising a finished crawl and
//! displaying the numbers on stdout.

use crate::crawler::CrawlReport;
use crate::url::extract_domain;
use crate::CrawlError;
use std::collections::{BTreeMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Number of recorded pages
    pub total_pages: u64,

    /// Pages scanned without an error
    pub pages_scanned: u64,

    /// Pages recorded with empty results after a failure
    pub pages_errored: u64,

    /// URLs blocked during the crawl
    pub blocked_urls: u64,

    /// Distinct media across the crawl
    pub unique_media: u64,

    /// Distinct same-domain links across the crawl
    pub unique_links: u64,

    /// Number of media per host
    pub media_by_host: BTreeMap<String, u64>,

    /// Per-page errors by kind
    pub error_summary: BTreeMap<&'static str, u64>,

    /// Wall-clock duration of the crawl
    pub duration_seconds: i64,
}

impl ScanStatistics {
    /// Computes statistics for a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        let unique_links: HashSet<&str> = report
            .pages
            .iter()
            .flat_map(|page| page.links.iter().map(String::as_str))
            .collect();

        let mut media_by_host = BTreeMap::new();
        for medium in &report.media {
            let host = extract_domain(medium).unwrap_or_else(|| "unknown".to_string());
            *media_by_host.entry(host).or_insert(0) += 1;
        }

        let mut error_summary = BTreeMap::new();
        for error in &report.errors {
            *error_summary.entry(error_kind(error)).or_insert(0) += 1;
        }

        let failed: HashSet<&str> = report
            .errors
            .iter()
            .filter(|e| !matches!(e, CrawlError::ContentRejected { .. }))
            .map(CrawlError::url)
            .collect();
        let pages_errored = report
            .pages
            .iter()
            .filter(|page| failed.contains(page.url.as_str()))
            .count() as u64;
        let total_pages = report.pages.len() as u64;

        Self {
            total_pages,
            pages_scanned: total_pages - pages_errored,
            pages_errored,
            blocked_urls: report.blocked.len() as u64,
            unique_media: report.media.len() as u64,
            unique_links: unique_links.len() as u64,
            media_by_host,
            error_summary,
            duration_seconds: report.duration().num_seconds(),
        }
    }

    /// Percentage of recorded pages scanned without an error
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.pages_scanned as f64 / self.total_pages as f64) * 100.0
    }
}

/// Short label for an error kind
pub fn error_kind(error: &CrawlError) -> &'static str {
    match error {
        CrawlError::ContentRejected { .. } => "content rejected",
        CrawlError::FetchTerminal { .. } => "fetch failed",
        CrawlError::Classification { .. } => "scan panicked",
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ScanStatistics) {
    println!("=== Scan Statistics ===\n");

    println!("Overview:");
    println!("  Pages recorded: {}", stats.total_pages);
    println!("  Pages with errors: {}", stats.pages_errored);
    println!("  Blocked URLs: {}", stats.blocked_urls);
    println!("  Unique links: {}", stats.unique_links);
    println!("  Unique media: {}", stats.unique_media);
    println!("  Duration: {}s", stats.duration_seconds);
    println!();

    if !stats.media_by_host.is_empty() {
        println!("Media by Host:");
        let mut hosts: Vec<_> = stats.media_by_host.iter().collect();
        hosts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (host, count) in hosts {
            println!("  {}: {}", host, count);
        }
        println!();
    }

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        for (kind, count) in &stats.error_summary {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages scanned)",
        stats.success_rate(),
        stats.pages_scanned,
        stats.total_pages
    );
}
