use serde::Deserialize;

/// Main configuration structure for Medium-Scout
///
/// Every section is optional, so an empty file is a valid configuration as
/// long as the entry URL is supplied some other way.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub media: MediaConfig,

    /// URLs and paths that are never scanned
    #[serde(default)]
    pub blocked: Vec<String>,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl limits and the entry URL
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Entry URL of the crawl
    pub url: Option<String>,

    /// Maximum number of pages admitted during the crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Interval between admission attempts (milliseconds)
    #[serde(rename = "tick-interval-ms", default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of pages probed or fetched at once
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Forwarded to the page fetcher
    #[serde(rename = "skip-external-resources", default)]
    pub skip_external_resources: bool,

    /// Request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_max_pages() -> usize {
    100
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_max_concurrency() -> usize {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_pages: default_max_pages(),
            tick_interval_ms: default_tick_interval_ms(),
            max_concurrency: default_max_concurrency(),
            skip_external_resources: false,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Edits to the medium prefix list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Replaces the built-in prefixes when present
    pub prefixes: Option<Vec<String>>,

    /// Prefixes appended to the list
    #[serde(default)]
    pub add: Vec<String>,

    /// Prefixes removed from the list
    #[serde(default)]
    pub remove: Vec<String>,

    /// Regular expression that also marks links as media
    #[serde(rename = "custom-pattern")]
    pub custom_pattern: Option<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// # Examples
    ///
    /// ```
    /// use medium_scout::config::UserAgentConfig;
    ///
    /// let config = UserAgentConfig {
    ///     crawler_name: "Scout".to_string(),
    ///     crawler_version: "2.0".to_string(),
    ///     contact_url: Some("https://example.com/bot".to_string()),
    ///     contact_email: None,
    /// };
    /// assert_eq!(config.user_agent_string(), "Scout/2.0 (+https://example.com/bot)");
    /// ```
    pub fn user_agent_string(&self) -> String {
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|url| format!("+{}", url)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}
