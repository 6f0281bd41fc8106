//! Crawl event hooks
//!
//! Callers observe a crawl through [`CrawlEvents`]. Every hook has a no-op
//! default, so implementors only override what they need. Hooks are invoked
//! from the driver loop one at a time, never concurrently.

use crate::crawler::page::Page;
use crate::CrawlError;

/// What to do with a page that is about to be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageDecision {
    /// Fetch and classify the page
    #[default]
    Continue,

    /// Block the page instead of fetching it
    Skip,
}

/// Observer of a running crawl
pub trait CrawlEvents: Send + Sync {
    /// Called before a page is fetched
    ///
    /// Returning [`PageDecision::Skip`] blocks the page. The decision is
    /// ignored for the entry page.
    fn page_start(&self, _page: &Page) -> PageDecision {
        PageDecision::Continue
    }

    /// Called once a page has been recorded with its media and links
    fn page_done(&self, _page: &Page) {}

    /// Called once for every per-page error
    fn page_error(&self, _error: &CrawlError) {}

    /// Called exactly once when the crawl is complete
    fn done(&self, _media: &[String], _pages: &[Page]) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl CrawlEvents for NoEvents {}

/// Observer that reports progress through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEvents;

impl CrawlEvents for LoggingEvents {
    fn page_start(&self, page: &Page) -> PageDecision {
        tracing::debug!("Scanning page {}: {}", page.key, page.url);
        PageDecision::Continue
    }

    fn page_done(&self, page: &Page) {
        tracing::info!(
            "Scanned {} ({} media, {} links)",
            page.url,
            page.media.len(),
            page.links.len()
        );
    }

    fn page_error(&self, error: &CrawlError) {
        tracing::warn!("{}", error);
    }

    fn done(&self, media: &[String], pages: &[Page]) {
        tracing::info!(
            "Crawl complete: {} media found on {} pages",
            media.len(),
            pages.len()
        );
    }
}
