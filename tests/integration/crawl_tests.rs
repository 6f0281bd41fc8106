//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the default HTTP fetcher and HEAD probe.

use medium_scout::config::parse_config;
use medium_scout::crawler::{
    crawl, CrawlEvents, NoEvents, Page, PageDecision, ScanOptions, Scanner,
};
use medium_scout::output::{write_markdown_report, ScanStatistics};
use medium_scout::CrawlError;
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Scan options tuned for a local mock server
fn fast_options(max_pages: usize) -> ScanOptions {
    ScanOptions {
        max_pages,
        tick_interval: Duration::from_millis(1),
        max_concurrency: 4,
        fetch_timeout: Duration::from_secs(5),
        ..ScanOptions::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Answers every HEAD request not matched by an earlier mock as HTML
async fn mount_html_probe(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;
}

/// Records every event in the order it was delivered
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl CrawlEvents for Recorder {
    fn page_start(&self, page: &Page) -> PageDecision {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {}", page.url));
        PageDecision::Continue
    }

    fn page_done(&self, page: &Page) {
        self.events.lock().unwrap().push(format!("done {}", page.url));
    }

    fn page_error(&self, error: &CrawlError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error {}", error.url()));
    }

    fn done(&self, media: &[String], pages: &[Page]) {
        self.events
            .lock()
            .unwrap()
            .push(format!("finished {} {}", media.len(), pages.len()));
    }
}

#[tokio::test]
async fn test_full_crawl_finds_media_across_pages() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_html_probe(&server).await;
    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a>
           <a href="/team/">Team</a>
           <a href="https://twitter.com/scout">Twitter</a>
           <a href="https://unrelated.org/page">Elsewhere</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/about",
        r#"<a href="https://www.facebook.com/scout">Facebook</a>
           <a href="/">Home</a>"#,
    )
    .await;
    mount_page(
        &server,
        "/team",
        r#"<span data-href="https://twitter.com/scout">Twitter again</span>"#,
    )
    .await;

    let scanner = Scanner::new(&base_url)
        .expect("mock server URL is valid")
        .with_options(fast_options(10));
    let recorder = Recorder::default();

    let report = scanner.run(&recorder).await.expect("Crawl failed");

    assert_eq!(report.url, base_url);
    assert_eq!(
        report.media,
        vec![
            "https://twitter.com/scout".to_string(),
            "https://www.facebook.com/scout".to_string(),
        ]
    );
    assert_eq!(report.pages.len(), 3);
    assert!(report.errors.is_empty());
    assert!(report.blocked.is_empty());

    let home = report.page(1).expect("entry page has key 1");
    assert_eq!(home.url, base_url);
    assert_eq!(
        home.links,
        vec![format!("{}/about", base_url), format!("{}/team", base_url)]
    );

    let events = recorder.events();
    assert_eq!(events.first(), Some(&format!("start {}", base_url)));
    assert_eq!(events.last(), Some(&"finished 2 3".to_string()));
    assert_eq!(events.iter().filter(|e| e.starts_with("finished")).count(), 1);
}

#[tokio::test]
async fn test_non_html_pages_are_blocked() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // Specific probe answers must be mounted before the catch-all
    Mock::given(method("HEAD"))
        .and(path("/brochure"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html_probe(&server).await;

    mount_page(
        &server,
        "/",
        r#"<a href="/brochure">Brochure</a>
           <a href="/gone">Gone</a>
           <a href="/contact">Contact</a>"#,
    )
    .await;
    mount_page(&server, "/contact", r#"<a href="https://x.com/scout">X</a>"#).await;

    // A rejected page must never be fetched
    Mock::given(method("GET"))
        .and(path("/brochure"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scanner = Scanner::new(&base_url)
        .expect("mock server URL is valid")
        .with_options(fast_options(10));

    let report = scanner.run(&NoEvents).await.expect("Crawl failed");

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.media, vec!["https://x.com/scout".to_string()]);

    let brochure = format!("{}/brochure", base_url);
    let gone = format!("{}/gone", base_url);
    assert!(report.blocked.contains(&brochure));
    assert!(report.blocked.contains(&gone));

    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|error| matches!(
        error,
        CrawlError::ContentRejected { .. }
    )));
    assert!(report
        .errors
        .iter()
        .any(|error| matches!(error, CrawlError::ContentRejected { url, reason }
            if *url == brochure && reason.contains("application/pdf"))));
}

#[tokio::test]
async fn test_page_budget_limits_crawl() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_html_probe(&server).await;
    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    for i in 1..=6 {
        mount_page(&server, &format!("/p{}", i), "Nothing here").await;
    }

    let scanner = Scanner::new(&base_url)
        .expect("mock server URL is valid")
        .with_options(fast_options(3));

    let report = scanner.run(&NoEvents).await.expect("Crawl failed");

    // The entry page counts against the budget
    assert_eq!(report.pages.len(), 3);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_missing_page_is_recorded_with_error() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_html_probe(&server).await;
    mount_page(&server, "/", r#"<a href="/missing">Missing</a>"#).await;

    // Status failures are terminal, so the page is requested exactly once
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let scanner = Scanner::new(&base_url)
        .expect("mock server URL is valid")
        .with_options(fast_options(10));
    let recorder = Recorder::default();

    let report = scanner.run(&recorder).await.expect("Crawl failed");
    let missing = format!("{}/missing", base_url);

    assert_eq!(report.pages.len(), 2);
    let page = report
        .pages
        .iter()
        .find(|page| page.url == missing)
        .expect("failed page is still recorded");
    assert!(page.media.is_empty());
    assert!(page.links.is_empty());

    assert!(matches!(
        report.errors.as_slice(),
        [CrawlError::FetchTerminal { url, attempts: 1, .. }] if *url == missing
    ));

    let events = recorder.events();
    let error_at = events
        .iter()
        .position(|e| *e == format!("error {}", missing))
        .expect("page_error emitted");
    let done_at = events
        .iter()
        .position(|e| *e == format!("done {}", missing))
        .expect("page_done emitted");
    assert!(error_at < done_at);
}

#[tokio::test]
async fn test_crawl_from_config_and_write_summary() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_html_probe(&server).await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private">Private</a>
           <a href="/news">News</a>
           <a href="https://bsky.app/profile/scout">Bluesky</a>"#,
    )
    .await;
    mount_page(&server, "/news", r#"<a href="https://mastodon.social/@scout">Toot</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let toml = format!(
        r#"
blocked = ["/private"]

[scan]
url = "{}"
max-pages = 5
tick-interval-ms = 1

[media]
add = ["mastodon.social/@"]
custom-pattern = 'bsky\.app/profile/'
"#,
        base_url
    );
    let config = parse_config(&toml).expect("valid configuration");

    let report = crawl(&config).await.expect("Crawl failed");

    assert_eq!(report.pages.len(), 2);
    assert!(report
        .media
        .contains(&"https://bsky.app/profile/scout".to_string()));
    assert!(report
        .media
        .contains(&"https://mastodon.social/@scout".to_string()));

    let stats = ScanStatistics::from_report(&report);
    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.unique_media, 2);

    let dir = tempfile::tempdir().expect("temp dir");
    let summary = dir.path().join("summary.md");
    write_markdown_report(&report, Some("abc123"), &summary).expect("report written");

    let written = std::fs::read_to_string(&summary).expect("report readable");
    assert!(written.contains("# Medium-Scout Report"));
    assert!(written.contains("- https://mastodon.social/@scout"));
    assert!(written.contains("- **Config Hash**: abc123"));
}
