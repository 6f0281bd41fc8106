//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the scanner and its driver loop, which coordinates:
//! - Scanning the entry page and seeding the frontier
//! - Admitting frontier URLs on a fixed tick, under the concurrency cap and
//!   the page budget
//! - Probing admitted URLs through the content gate
//! - Fetching and classifying accepted pages, with retries for name
//!   resolution failures
//! - Emitting lifecycle events and building the final report
//!
//! All session state is owned by the driver loop. Probes and fetches run as
//! tasks that only report their outcome back to it.

use crate::config::{Config, ScanConfig, UserAgentConfig};
use crate::crawler::classifier::{classify, Classified};
use crate::crawler::events::{CrawlEvents, PageDecision};
use crate::crawler::fetcher::{
    build_http_client, FetchOptions, HttpPageFetcher, PageFetcher,
};
use crate::crawler::gate::{ContentProbe, HeadProbe, ProbeOutcome};
use crate::crawler::page::{CrawlReport, Page};
use crate::crawler::session::Session;
use crate::media::{MediumList, MediumMatcher};
use crate::url::{normalize_href, BlockList, PageLocation, ResolvedLink};
use crate::{ConfigError, ConfigResult, CrawlError, Result, ScoutError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::{self, MissedTickBehavior};

/// Total number of attempts for a page whose host name does not resolve
pub const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Upper bound for `max_concurrency`
pub const MAX_CONCURRENCY_LIMIT: usize = 100;

/// Tunable limits of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Maximum number of pages admitted during the crawl
    pub max_pages: usize,

    /// Interval between admission attempts
    pub tick_interval: Duration,

    /// Maximum number of pages probed or fetched at once
    pub max_concurrency: usize,

    /// Forwarded to the page fetcher
    pub skip_external_resources: bool,

    /// Request timeout of the default HTTP collaborators
    pub fetch_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_pages: 100,
            tick_interval: Duration::from_millis(250),
            max_concurrency: 10,
            skip_external_resources: false,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl ScanOptions {
    /// Checks that every limit is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first bad limit.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_pages == 0 {
            return Err(ConfigError::Validation(
                "max-pages must be at least 1".to_string(),
            ));
        }

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(ConfigError::Validation(format!(
                "max-concurrency must be between 1 and {}, got {}",
                MAX_CONCURRENCY_LIMIT, self.max_concurrency
            )));
        }

        if self.tick_interval < Duration::from_millis(1) {
            return Err(ConfigError::Validation(
                "tick-interval-ms must be at least 1".to_string(),
            ));
        }

        if self.fetch_timeout < Duration::from_secs(1) {
            return Err(ConfigError::Validation(
                "fetch-timeout-secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            max_concurrency: config.max_concurrency,
            skip_external_resources: config.skip_external_resources,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }
}

/// Crawls one site and collects its social-media links
///
/// # Example
///
/// ```no_run
/// use medium_scout::crawler::LoggingEvents;
/// use medium_scout::Scanner;
///
/// # async fn example() -> medium_scout::Result<()> {
/// let mut scanner = Scanner::new("https://example.com")?;
/// scanner.add_medium("mastodon.social/@");
///
/// let report = scanner.run(&LoggingEvents).await?;
/// for medium in &report.media {
///     println!("{}", medium);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scanner {
    entry: ResolvedLink,
    options: ScanOptions,
    media: MediumList,
    custom_pattern: Option<String>,
    block_list: BlockList,
    user_agent: UserAgentConfig,
    fetcher: Option<Arc<dyn PageFetcher>>,
    probe: Option<Arc<dyn ContentProbe>>,
}

impl Scanner {
    /// Creates a scanner for the given entry URL with default settings
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::InvalidUrl` unless the URL is a valid absolute
    /// `http` or `https` URL.
    pub fn new(url: &str) -> Result<Self> {
        let entry = normalize_href(url)
            .and_then(|normalized| ResolvedLink::from_absolute(&normalized))
            .filter(|link| link.protocol == "http:" || link.protocol == "https:")
            .ok_or_else(|| ScoutError::InvalidUrl {
                url: url.to_string(),
            })?;

        Ok(Self {
            entry,
            options: ScanOptions::default(),
            media: MediumList::default(),
            custom_pattern: None,
            block_list: BlockList::new(),
            user_agent: UserAgentConfig::default(),
            fetcher: None,
            probe: None,
        })
    }

    /// Creates a scanner from a loaded configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration has no entry URL or an invalid one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.scan.url.as_deref().ok_or_else(|| {
            ConfigError::Validation("scan.url is required to start a crawl".to_string())
        })?;

        let mut scanner = Self::new(url)?
            .with_options(ScanOptions::from(&config.scan))
            .with_user_agent(config.user_agent.clone());

        if let Some(prefixes) = &config.media.prefixes {
            scanner.media = MediumList::new(prefixes);
        }
        scanner.add_media(&config.media.add);
        scanner.remove_media(&config.media.remove);
        scanner.custom_pattern = config.media.custom_pattern.clone();

        for entry in &config.blocked {
            scanner.block_url(entry);
        }

        Ok(scanner)
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_user_agent(mut self, user_agent: UserAgentConfig) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Replaces the default HTTP page fetcher
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Replaces the default HEAD-request content probe
    pub fn with_probe(mut self, probe: Arc<dyn ContentProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Adds an expression that also marks links as media
    pub fn with_custom_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.custom_pattern = Some(pattern.into());
        self
    }

    /// The normalized entry URL
    pub fn url(&self) -> &str {
        &self.entry.url
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ScanOptions {
        &mut self.options
    }

    /// The medium prefixes used for classification
    pub fn media(&self) -> &MediumList {
        &self.media
    }

    /// Adds a medium prefix; returns false if it is already present
    pub fn add_medium(&mut self, medium: impl Into<String>) -> bool {
        self.media.add(medium)
    }

    pub fn add_media<I, S>(&mut self, media: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media.extend(media);
    }

    /// Removes a medium prefix; returns false if it was not present
    pub fn remove_medium(&mut self, medium: &str) -> bool {
        self.media.remove(medium)
    }

    pub fn remove_media<I, S>(&mut self, media: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.media.remove_all(media);
    }

    /// Never scan the given URL or path
    ///
    /// An entry matches a URL equal to it, or a URL whose last path segment
    /// equals it (with or without the leading `/`).
    pub fn block_url(&mut self, url: &str) -> bool {
        self.block_list.push(url)
    }

    pub fn blocked_urls(&self) -> &[String] {
        self.block_list.entries()
    }

    fn matcher(&self) -> ConfigResult<MediumMatcher> {
        let matcher = self.media.matcher()?;
        match &self.custom_pattern {
            Some(pattern) => matcher.with_custom_pattern(pattern),
            None => Ok(matcher),
        }
    }

    fn collaborators(&self) -> Result<(Arc<dyn PageFetcher>, Arc<dyn ContentProbe>)> {
        if let (Some(fetcher), Some(probe)) = (&self.fetcher, &self.probe) {
            return Ok((Arc::clone(fetcher), Arc::clone(probe)));
        }

        let client = build_http_client(&self.user_agent, self.options.fetch_timeout)?;

        let fetcher: Arc<dyn PageFetcher> = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => Arc::new(HttpPageFetcher::new(client.clone())),
        };
        let probe: Arc<dyn ContentProbe> = match &self.probe {
            Some(probe) => Arc::clone(probe),
            None => Arc::new(HeadProbe::new(client)),
        };

        Ok((fetcher, probe))
    }

    /// Runs the crawl to completion
    ///
    /// The entry page is scanned first, without a content probe. Discovered
    /// same-domain links are then admitted one per tick until the budget is
    /// spent or nothing is left. `events.done` fires exactly once, right
    /// before this returns.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned: invalid options, an invalid medium
    /// pattern, or an HTTP client that cannot be built. Per-page failures are
    /// reported through `events.page_error` and in the report.
    pub async fn run(&self, events: &dyn CrawlEvents) -> Result<CrawlReport> {
        self.options.validate()?;
        let matcher = Arc::new(self.matcher()?);
        let (fetcher, probe) = self.collaborators()?;

        tracing::info!(
            "Starting crawl of {} (max {} pages, {} concurrent)",
            self.entry.url,
            self.options.max_pages,
            self.options.max_concurrency
        );

        let context = ScanContext {
            fetcher,
            matcher,
            crawl_domain: self.entry.domain.clone(),
            fallback: self.entry.location(),
            options: FetchOptions {
                skip_external_resources: self.options.skip_external_resources,
            },
        };

        let session = Session::new(
            self.entry.clone(),
            self.options.max_pages,
            self.options.max_concurrency,
            self.block_list.clone(),
        );

        let mut driver = Driver {
            session,
            tasks: JoinSet::new(),
            pending: HashMap::new(),
            context,
            probe,
            events,
        };

        driver.open_entry();
        driver.drive(self.options.tick_interval).await;

        let report = driver.session.finish(events);
        tracing::info!(
            "Crawl of {} finished: {} pages, {} media, {} errors in {}s",
            report.url,
            report.pages.len(),
            report.media.len(),
            report.errors.len(),
            report.duration().num_seconds()
        );

        Ok(report)
    }
}

/// Outcome reported back to the driver by a spawned task
enum TaskOutcome {
    Probed {
        url: String,
        outcome: ProbeOutcome,
    },
    Scanned {
        page: Page,
        result: std::result::Result<Classified, CrawlError>,
    },
}

/// What a spawned task was started for, kept until it is joined
enum Pending {
    Probe(String),
    Scan(Page),
}

/// Shared, read-only inputs of a page scan
#[derive(Clone)]
struct ScanContext {
    fetcher: Arc<dyn PageFetcher>,
    matcher: Arc<MediumMatcher>,
    crawl_domain: String,
    fallback: PageLocation,
    options: FetchOptions,
}

impl ScanContext {
    async fn scan(self, page: Page) -> TaskOutcome {
        let result = self.fetch_and_classify(&page.url).await;
        TaskOutcome::Scanned { page, result }
    }

    async fn fetch_and_classify(&self, url: &str) -> std::result::Result<Classified, CrawlError> {
        let hrefs = fetch_with_retry(self.fetcher.as_ref(), url, &self.options).await?;
        let base = ResolvedLink::from_absolute(url)
            .map(|link| link.location())
            .unwrap_or_else(|| self.fallback.clone());

        Ok(classify(&base, &self.crawl_domain, &hrefs, &self.matcher))
    }
}

/// Fetches a page, retrying name resolution failures
///
/// Transient failures are attempted up to [`MAX_FETCH_ATTEMPTS`] times in
/// total. Any other failure is terminal at once.
pub async fn fetch_with_retry(
    fetcher: &dyn PageFetcher,
    url: &str,
    options: &FetchOptions,
) -> std::result::Result<Vec<String>, CrawlError> {
    let mut attempts = 0;

    loop {
        attempts += 1;

        match fetcher.fetch(url, options).await {
            Ok(hrefs) => return Ok(hrefs),
            Err(e) if e.is_transient() && attempts < MAX_FETCH_ATTEMPTS => {
                tracing::warn!(
                    "Attempt {}/{} for {} failed: {}",
                    attempts,
                    MAX_FETCH_ATTEMPTS,
                    url,
                    e
                );
            }
            Err(source) => {
                return Err(CrawlError::FetchTerminal {
                    url: url.to_string(),
                    attempts,
                    source,
                })
            }
        }
    }
}

fn describe_join_error(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

/// Single owner of the session while a crawl runs
///
/// Every spawned task is registered in `pending` under its task id, so a
/// task that panics still settles the URL it was started for.
struct Driver<'a> {
    session: Session,
    tasks: JoinSet<TaskOutcome>,
    pending: HashMap<task::Id, Pending>,
    context: ScanContext,
    probe: Arc<dyn ContentProbe>,
    events: &'a dyn CrawlEvents,
}

impl Driver<'_> {
    /// Starts the entry page scan, without a content probe
    fn open_entry(&mut self) {
        let page = self.session.open_entry();

        if self.events.page_start(&page) == PageDecision::Skip {
            tracing::debug!("Ignoring skip request for entry page {}", page.url);
        }

        self.spawn_scan(page);
    }

    /// Admits and completes pages until the session is done
    async fn drive(&mut self, tick_interval: Duration) {
        let mut ticker = time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while self.session.refresh_phase().is_active() {
            tokio::select! {
                Some(joined) = self.tasks.join_next_with_id() => match joined {
                    Ok((id, outcome)) => {
                        self.pending.remove(&id);
                        self.handle(outcome);
                    }
                    Err(e) => self.settle_failed_task(e),
                },
                _ = ticker.tick() => self.admit(),
            }
        }
    }

    /// Admits the next frontier URL and probes it
    fn admit(&mut self) {
        let Some(url) = self.session.admit_next() else {
            return;
        };

        let probe = Arc::clone(&self.probe);
        let probed = url.clone();
        let handle = self.tasks.spawn(async move {
            let outcome = probe.probe(&probed).await;
            TaskOutcome::Probed {
                url: probed,
                outcome,
            }
        });
        self.pending.insert(handle.id(), Pending::Probe(url));
    }

    fn spawn_scan(&mut self, page: Page) {
        let scanned = Page::new(page.url.clone(), page.key);
        let handle = self.tasks.spawn(self.context.clone().scan(page));
        self.pending.insert(handle.id(), Pending::Scan(scanned));
    }

    fn handle(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Probed {
                url,
                outcome: ProbeOutcome::Accepted,
            } => self.start(url),
            TaskOutcome::Probed { url, outcome } => {
                let reason = outcome.reason().unwrap_or("rejected").to_string();
                self.reject(&url, reason);
            }
            TaskOutcome::Scanned {
                page,
                result: Ok(classified),
            } => self.session.record(page.with_results(classified), self.events),
            TaskOutcome::Scanned {
                page,
                result: Err(error),
            } => self.session.record_failure(page, error, self.events),
        }
    }

    fn reject(&mut self, url: &str, reason: String) {
        tracing::debug!("Content gate rejected {}: {}", url, reason);
        self.session.reject(url, reason, self.events);
        self.admit();
    }

    /// Keys an accepted URL and hands it to the fetcher unless the caller skips it
    fn start(&mut self, url: String) {
        let page = self.session.accept(url);

        if self.events.page_start(&page) == PageDecision::Skip {
            self.session.skip(&page.url);
            self.admit();
            return;
        }

        self.spawn_scan(page);
    }

    /// Settles the work of a task that panicked or was cancelled
    ///
    /// A failed probe rejects its URL; a failed scan records the page empty
    /// with a classification error.
    fn settle_failed_task(&mut self, error: JoinError) {
        let id = error.id();
        let message = describe_join_error(error);

        match self.pending.remove(&id) {
            Some(Pending::Probe(url)) => self.reject(&url, message),
            Some(Pending::Scan(page)) => {
                let error = CrawlError::Classification {
                    url: page.url.clone(),
                    message,
                };
                self.session.record_failure(page, error, self.events);
            }
            None => tracing::error!("Unknown crawl task {} failed: {}", id, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FetchError, FetchErrorKind};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct SiteFetcher {
        pages: HashMap<String, Vec<String>>,
        failures: HashMap<String, FetchErrorKind>,
        attempts: Mutex<HashMap<String, u32>>,
        active: AtomicUsize,
        peak: AtomicUsize,
        delay: Duration,
    }

    impl SiteFetcher {
        fn page(mut self, url: &str, hrefs: &[&str]) -> Self {
            self.pages
                .insert(url.to_string(), hrefs.iter().map(|h| h.to_string()).collect());
            self
        }

        fn failing(mut self, url: &str, kind: FetchErrorKind) -> Self {
            self.failures.insert(url.to_string(), kind);
            self
        }

        fn attempts(&self, url: &str) -> u32 {
            self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl PageFetcher for SiteFetcher {
        async fn fetch(
            &self,
            url: &str,
            _options: &FetchOptions,
        ) -> std::result::Result<Vec<String>, FetchError> {
            *self
                .attempts
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default() += 1;

            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(active, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            if url.ends_with("/panic") {
                panic!("malformed markup");
            }

            if let Some(kind) = self.failures.get(url) {
                return Err(FetchError::new(*kind, "mock failure"));
            }

            Ok(self.pages.get(url).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct Gate {
        rejected: HashSet<String>,
        probed: Mutex<Vec<String>>,
    }

    impl Gate {
        fn rejecting(urls: &[&str]) -> Self {
            Self {
                rejected: urls.iter().map(|u| u.to_string()).collect(),
                probed: Mutex::new(Vec::new()),
            }
        }

        fn probes(&self, url: &str) -> usize {
            self.probed.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl ContentProbe for Gate {
        async fn probe(&self, url: &str) -> ProbeOutcome {
            self.probed.lock().unwrap().push(url.to_string());

            if url.ends_with("/explode") {
                panic!("gate crashed");
            }

            if self.rejected.contains(url) {
                ProbeOutcome::Rejected {
                    reason: "content type application/pdf".to_string(),
                }
            } else {
                ProbeOutcome::Accepted
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        skip: HashSet<String>,
        started: Mutex<Vec<u32>>,
        finished: Mutex<Vec<String>>,
        errors: Mutex<Vec<CrawlError>>,
        done_calls: AtomicUsize,
    }

    impl CrawlEvents for Recorder {
        fn page_start(&self, page: &Page) -> PageDecision {
            self.started.lock().unwrap().push(page.key);
            if self.skip.contains(&page.url) {
                PageDecision::Skip
            } else {
                PageDecision::Continue
            }
        }

        fn page_done(&self, page: &Page) {
            self.finished.lock().unwrap().push(page.url.clone());
        }

        fn page_error(&self, error: &CrawlError) {
            self.errors.lock().unwrap().push(error.clone());
        }

        fn done(&self, _media: &[String], _pages: &[Page]) {
            self.done_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fast_options() -> ScanOptions {
        ScanOptions {
            tick_interval: Duration::from_millis(1),
            ..ScanOptions::default()
        }
    }

    fn scanner(fetcher: Arc<SiteFetcher>, gate: Arc<Gate>) -> Scanner {
        Scanner::new("http://a.com")
            .unwrap()
            .with_options(fast_options())
            .with_fetcher(fetcher)
            .with_probe(gate)
    }

    #[test]
    fn test_invalid_entry_url() {
        assert!(matches!(
            Scanner::new("not a url"),
            Err(ScoutError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Scanner::new("ftp://a.com/file"),
            Err(ScoutError::InvalidUrl { .. })
        ));
        assert!(Scanner::new("").is_err());
    }

    #[test]
    fn test_entry_url_is_normalized() {
        let scanner = Scanner::new("  https://a.com/  ").unwrap();
        assert_eq!(scanner.url(), "https://a.com");
    }

    #[test]
    fn test_medium_list_editing() {
        let mut scanner = Scanner::new("http://a.com").unwrap();
        let before = scanner.media().len();

        assert!(scanner.add_medium("mastodon.social/@"));
        assert!(!scanner.add_medium("mastodon.social/@"));
        assert!(scanner.remove_medium("facebook.com/"));
        assert!(!scanner.remove_medium("facebook.com/"));
        assert_eq!(scanner.media().len(), before);
    }

    #[test]
    fn test_options_validation() {
        assert!(ScanOptions::default().validate().is_ok());

        let zero_pages = ScanOptions {
            max_pages: 0,
            ..ScanOptions::default()
        };
        assert!(zero_pages.validate().is_err());

        let too_concurrent = ScanOptions {
            max_concurrency: 101,
            ..ScanOptions::default()
        };
        assert!(too_concurrent.validate().is_err());

        let no_tick = ScanOptions {
            tick_interval: Duration::ZERO,
            ..ScanOptions::default()
        };
        assert!(no_tick.validate().is_err());
    }

    #[tokio::test]
    async fn test_invalid_options_are_fatal() {
        let fetcher = Arc::new(SiteFetcher::default());
        let scanner = scanner(fetcher.clone(), Arc::new(Gate::default())).with_options(ScanOptions {
            max_concurrency: 0,
            ..fast_options()
        });

        let result = scanner.run(&Recorder::default()).await;
        assert!(matches!(result, Err(ScoutError::Config(_))));
        assert_eq!(fetcher.attempts("http://a.com"), 0);
    }

    #[tokio::test]
    async fn test_invalid_custom_pattern_is_fatal() {
        let scanner = scanner(Arc::new(SiteFetcher::default()), Arc::new(Gate::default()))
            .with_custom_pattern("(unclosed");

        let result = scanner.run(&Recorder::default()).await;
        assert!(matches!(
            result,
            Err(ScoutError::Config(ConfigError::InvalidPattern(_)))
        ));
    }

    #[tokio::test]
    async fn test_collects_media_across_pages() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page(
                    "http://a.com",
                    &["/about", "http://facebook.com/a", "#top", "http://b.com/x"],
                )
                .page(
                    "http://a.com/about",
                    &["http://twitter.com/acme", "http://facebook.com/a", "/"],
                ),
        );
        let gate = Arc::new(Gate::default());
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), gate.clone()).run(&events).await.unwrap();

        assert_eq!(
            report.media,
            vec!["http://facebook.com/a", "http://twitter.com/acme"]
        );
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.page(1).unwrap().links, vec!["http://a.com/about"]);
        assert_eq!(report.page(2).unwrap().url, "http://a.com/about");
        assert!(report.errors.is_empty());

        assert_eq!(gate.probes("http://a.com"), 0);
        assert_eq!(gate.probes("http://a.com/about"), 1);
        assert_eq!(fetcher.attempts("http://b.com/x"), 0);
        assert_eq!(*events.started.lock().unwrap(), vec![1, 2]);
        assert_eq!(events.done_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_name_resolution_is_retried_three_times() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("http://a.com", &["/flaky"])
                .failing("http://a.com/flaky", FetchErrorKind::NameResolution),
        );
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(fetcher.attempts("http://a.com/flaky"), 3);

        let errors = events.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            CrawlError::FetchTerminal { attempts: 3, .. }
        ));

        let page = report.page(2).unwrap();
        assert!(page.media.is_empty());
        assert!(page.links.is_empty());
        assert_eq!(events.done_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("http://a.com", &["/gone", "/ok"])
                .failing("http://a.com/gone", FetchErrorKind::Status(404)),
        );
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(fetcher.attempts("http://a.com/gone"), 1);
        assert_eq!(fetcher.attempts("http://a.com/ok"), 1);
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].url(), "http://a.com/gone");
    }

    #[tokio::test]
    async fn test_rejected_urls_are_never_retried() {
        let fetcher = Arc::new(
            SiteFetcher::default()
                .page("http://a.com", &["/download", "/1"])
                .page("http://a.com/1", &["/download", "/2"])
                .page("http://a.com/2", &["http://a.com/download"]),
        );
        let gate = Arc::new(Gate::rejecting(&["http://a.com/download"]));
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), gate.clone()).run(&events).await.unwrap();

        assert_eq!(gate.probes("http://a.com/download"), 1);
        assert_eq!(fetcher.attempts("http://a.com/download"), 0);
        assert_eq!(report.blocked, vec!["http://a.com/download"]);
        assert!(report.pages.iter().all(|p| p.url != "http://a.com/download"));

        let errors = events.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CrawlError::ContentRejected { .. }));
    }

    #[tokio::test]
    async fn test_budget_is_respected() {
        let links: Vec<String> = (1..=10).map(|i| format!("/{}", i)).collect();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &links));
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .with_options(ScanOptions {
                max_pages: 3,
                ..fast_options()
            })
            .run(&events)
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 3);
        assert_eq!(fetcher.attempts("http://a.com/1"), 1);
        assert_eq!(fetcher.attempts("http://a.com/2"), 1);
        assert_eq!(fetcher.attempts("http://a.com/3"), 0);
        assert_eq!(events.done_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejections_free_the_budget() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &["/file", "/1"]));
        let gate = Arc::new(Gate::rejecting(&["http://a.com/file"]));

        let report = scanner(fetcher.clone(), gate)
            .with_options(ScanOptions {
                max_pages: 2,
                ..fast_options()
            })
            .run(&Recorder::default())
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 2);
        assert_eq!(fetcher.attempts("http://a.com/1"), 1);
    }

    #[tokio::test]
    async fn test_rejected_urls_take_no_page_key() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &["/file", "/1"]));
        let gate = Arc::new(Gate::rejecting(&["http://a.com/file"]));
        let events = Recorder::default();

        let report = scanner(fetcher, gate).run(&events).await.unwrap();

        let keys: Vec<(u32, &str)> = report
            .pages
            .iter()
            .map(|page| (page.key, page.url.as_str()))
            .collect();
        assert_eq!(keys, vec![(1, "http://a.com"), (2, "http://a.com/1")]);
        assert_eq!(*events.started.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_gate_panic_blocks_url_and_crawl_finishes() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &["/explode", "/ok"]));
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(fetcher.attempts("http://a.com/explode"), 0);
        assert_eq!(fetcher.attempts("http://a.com/ok"), 1);
        assert_eq!(report.blocked, vec!["http://a.com/explode"]);
        assert_eq!(report.page(2).unwrap().url, "http://a.com/ok");

        let errors = events.errors.lock().unwrap();
        assert!(matches!(
            errors.as_slice(),
            [CrawlError::ContentRejected { reason, .. }] if reason.contains("gate crashed")
        ));
        assert_eq!(events.done_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrency_cap() {
        let links: Vec<String> = (1..=8).map(|i| format!("/{}", i)).collect();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        let fetcher = Arc::new(SiteFetcher {
            delay: Duration::from_millis(20),
            ..SiteFetcher::default().page("http://a.com", &links)
        });

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .with_options(ScanOptions {
                max_concurrency: 2,
                ..fast_options()
            })
            .run(&Recorder::default())
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 9);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_skip_blocks_page() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &["/private", "/public"]));
        let events = Recorder {
            skip: ["http://a.com/private".to_string()].into_iter().collect(),
            ..Recorder::default()
        };

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(fetcher.attempts("http://a.com/private"), 0);
        assert_eq!(fetcher.attempts("http://a.com/public"), 1);
        assert_eq!(report.blocked, vec!["http://a.com/private"]);
        assert!(events.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_skip_is_ignored_for_entry_page() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &[]));
        let events = Recorder {
            skip: ["http://a.com".to_string()].into_iter().collect(),
            ..Recorder::default()
        };

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(fetcher.attempts("http://a.com"), 1);
        assert_eq!(report.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_block_list() {
        let fetcher = Arc::new(
            SiteFetcher::default().page("http://a.com", &["/admin", "/team/admin", "/team"]),
        );
        let mut scanner = scanner(fetcher.clone(), Arc::new(Gate::default()));
        scanner.block_url("/admin");

        let report = scanner.run(&Recorder::default()).await.unwrap();

        assert_eq!(fetcher.attempts("http://a.com/admin"), 0);
        assert_eq!(fetcher.attempts("http://a.com/team/admin"), 0);
        assert_eq!(fetcher.attempts("http://a.com/team"), 1);
        assert_eq!(report.pages.len(), 2);
    }

    #[tokio::test]
    async fn test_panic_is_reported_and_crawl_continues() {
        let fetcher = Arc::new(SiteFetcher::default().page("http://a.com", &["/panic", "/ok"]));
        let events = Recorder::default();

        let report = scanner(fetcher.clone(), Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 3);
        assert_eq!(fetcher.attempts("http://a.com/ok"), 1);

        let errors = events.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], CrawlError::Classification { .. }));
    }

    #[tokio::test]
    async fn test_entry_page_failure() {
        let fetcher = Arc::new(
            SiteFetcher::default().failing("http://a.com", FetchErrorKind::Connect),
        );
        let events = Recorder::default();

        let report = scanner(fetcher, Arc::new(Gate::default()))
            .run(&events)
            .await
            .unwrap();

        assert_eq!(report.pages.len(), 1);
        assert!(report.media.is_empty());
        assert_eq!(events.errors.lock().unwrap().len(), 1);
        assert_eq!(*events.finished.lock().unwrap(), vec!["http://a.com"]);
        assert_eq!(events.done_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_pattern_marks_media() {
        let fetcher = Arc::new(
            SiteFetcher::default().page("http://a.com", &["https://mastodon.social/@acme"]),
        );

        let report = scanner(fetcher, Arc::new(Gate::default()))
            .with_custom_pattern(r"mastodon\.social/@")
            .run(&Recorder::default())
            .await
            .unwrap();

        assert_eq!(report.media, vec!["https://mastodon.social/@acme"]);
    }
}
