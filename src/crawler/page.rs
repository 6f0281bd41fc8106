//! Scanned pages and crawl reports

use crate::crawler::classifier::Classified;
use crate::CrawlError;
use chrono::{DateTime, Utc};

/// A page admitted by the scheduler
///
/// `media` and `links` stay empty until the page is scanned, and remain empty
/// if the scan fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Absolute URL of the page
    pub url: String,

    /// Unique key assigned at admission, starting at 1 for the entry page
    pub key: u32,

    /// Social-media links found on the page
    pub media: Vec<String>,

    /// Same-domain links found on the page
    pub links: Vec<String>,
}

impl Page {
    pub fn new(url: impl Into<String>, key: u32) -> Self {
        Self {
            url: url.into(),
            key,
            media: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Stores the classification results on this page
    pub fn with_results(mut self, classified: Classified) -> Self {
        self.media = classified.media;
        self.links = classified.links;
        self
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Entry URL of the crawl
    pub url: String,

    /// Distinct media across all pages, in first-seen order
    pub media: Vec<String>,

    /// Recorded pages, in completion order
    pub pages: Vec<Page>,

    /// URLs blocked during the crawl (content rejections and skips)
    pub blocked: Vec<String>,

    /// Every per-page error reported during the crawl
    pub errors: Vec<CrawlError>,

    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Returns the page with the given key
    pub fn page(&self, key: u32) -> Option<&Page> {
        self.pages.iter().find(|page| page.key == key)
    }

    /// Number of pages that were scanned without an error
    pub fn pages_scanned(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| !self.errors.iter().any(|e| e.url() == page.url))
            .count()
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
