//! Crawl session state
//!
//! A [`Session`] owns everything one crawl mutates: the scheduler, the
//! accumulated media, the recorded pages and the page key counter. It is
//! only ever touched by the driver loop, so no locking is needed.

use crate::crawler::events::CrawlEvents;
use crate::crawler::page::{CrawlReport, Page};
use crate::crawler::scheduler::{Admission, Scheduler};
use crate::state::CrawlPhase;
use crate::url::{BlockList, ResolvedLink};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Progress is logged every this many recorded pages
const PROGRESS_INTERVAL: usize = 10;

/// Mutable state of a single crawl
#[derive(Debug)]
pub struct Session {
    entry: ResolvedLink,
    scheduler: Scheduler,
    media: Vec<String>,
    media_seen: HashSet<String>,
    pages: Vec<Page>,
    errors: Vec<CrawlError>,
    next_key: u32,
    phase: CrawlPhase,
    done_fired: bool,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for the given entry URL
    pub fn new(
        entry: ResolvedLink,
        max_pages: usize,
        max_concurrency: usize,
        block_list: BlockList,
    ) -> Self {
        Self {
            entry,
            scheduler: Scheduler::new(max_pages, max_concurrency, block_list),
            media: Vec::new(),
            media_seen: HashSet::new(),
            pages: Vec::new(),
            errors: Vec::new(),
            next_key: 1,
            phase: CrawlPhase::Idle,
            done_fired: false,
            started_at: Utc::now(),
        }
    }

    pub fn entry(&self) -> &ResolvedLink {
        &self.entry
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn media(&self) -> &[String] {
        &self.media
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    fn allocate_key(&mut self) -> u32 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    /// Admits the entry page and returns it with key 1
    pub fn open_entry(&mut self) -> Page {
        let url = self.entry.url.clone();
        self.scheduler.admit_entry(&url);
        self.refresh_phase();
        Page::new(url, self.allocate_key())
    }

    /// Admits the next frontier URL, if any
    ///
    /// The URL gets no page key until the content gate accepts it.
    pub fn admit_next(&mut self) -> Option<String> {
        match self.scheduler.next_admission() {
            Admission::Admit(url) => {
                tracing::debug!("Admitted {}", url);
                Some(url)
            }
            Admission::AtCapacity => {
                tracing::trace!("At capacity ({} in flight)", self.scheduler.in_flight());
                None
            }
            Admission::BudgetReached => {
                tracing::trace!("Page budget of {} reached", self.scheduler.max_pages());
                None
            }
            Admission::Idle => None,
        }
    }

    /// Assigns the next page key to a URL the content gate accepted
    pub fn accept(&mut self, url: String) -> Page {
        let key = self.allocate_key();
        tracing::debug!("Page {}: {}", key, url);
        Page::new(url, key)
    }

    /// Blocks a URL the content gate rejected and reports it
    pub fn reject(&mut self, url: &str, reason: String, events: &dyn CrawlEvents) {
        self.scheduler.block(url);
        let error = CrawlError::ContentRejected {
            url: url.to_string(),
            reason,
        };
        events.page_error(&error);
        self.errors.push(error);
        self.refresh_phase();
    }

    /// Blocks a URL the caller chose to skip
    pub fn skip(&mut self, url: &str) {
        tracing::debug!("Skipping {}", url);
        self.scheduler.block(url);
        self.refresh_phase();
    }

    /// Records a successfully scanned page
    ///
    /// New media are merged into the session, new links go to the frontier
    /// and `page_done` fires.
    pub fn record(&mut self, page: Page, events: &dyn CrawlEvents) {
        for medium in &page.media {
            if self.media_seen.insert(medium.clone()) {
                self.media.push(medium.clone());
            }
        }

        let added = self.scheduler.enqueue(&page.links);
        tracing::trace!("{} new links from {}", added, page.url);

        self.scheduler.complete(&page.url);
        events.page_done(&page);
        self.pages.push(page);
        self.log_progress();
        self.refresh_phase();
    }

    /// Records a page whose scan failed
    ///
    /// The page is kept with empty results, `page_error` fires, then
    /// `page_done`.
    pub fn record_failure(&mut self, page: Page, error: CrawlError, events: &dyn CrawlEvents) {
        let page = Page::new(page.url, page.key);

        self.scheduler.complete(&page.url);
        events.page_error(&error);
        self.errors.push(error);
        events.page_done(&page);
        self.pages.push(page);
        self.log_progress();
        self.refresh_phase();
    }

    fn log_progress(&self) {
        if self.pages.len() % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages scanned, {} in frontier, {} media found",
                self.pages.len(),
                self.scheduler.frontier_len(),
                self.media.len()
            );
        }
    }

    /// Recomputes the phase from the scheduler and returns it
    pub fn refresh_phase(&mut self) -> CrawlPhase {
        let next = self.scheduler.phase();

        if next != self.phase {
            if self.phase.can_transition_to(next) {
                tracing::debug!("Crawl phase {} -> {}", self.phase, next);
                self.phase = next;
            } else {
                tracing::warn!("Ignoring crawl phase change {} -> {}", self.phase, next);
            }
        }

        self.phase
    }

    /// Fires `done` (at most once per session) and builds the report
    pub fn finish(&mut self, events: &dyn CrawlEvents) -> CrawlReport {
        if !self.done_fired {
            self.done_fired = true;
            events.done(&self.media, &self.pages);
        }

        CrawlReport {
            url: self.entry.url.clone(),
            media: self.media.clone(),
            pages: self.pages.clone(),
            blocked: self.scheduler.blocked().to_vec(),
            errors: self.errors.clone(),
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
