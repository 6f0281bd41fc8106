//! Content gate
//!
//! Before a discovered page is fetched, a lightweight probe checks that the
//! URL serves an HTML document. Rejected URLs are blocked for the rest of the
//! crawl and are never retried.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Media type a probed URL must serve
const HTML_CONTENT_TYPE: &str = "text/html";

/// Result of probing a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The URL serves HTML and may be fetched
    Accepted,

    /// The URL answered, but not with an HTML page
    Rejected { reason: String },

    /// The probe itself failed
    Failed { error: String },
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection reason, or `None` if the URL was accepted
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected { reason } => Some(reason),
            Self::Failed { error } => Some(error),
        }
    }
}

/// Decides whether a URL should be fetched
#[async_trait]
pub trait ContentProbe: Send + Sync {
    /// Probes `url`. Must not panic on network failures; report them as
    /// [`ProbeOutcome::Failed`] instead.
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Returns true if a probe response describes an HTML page
///
/// The status must be exactly 200 and the content type must mention
/// `text/html` (parameters such as `charset` are allowed).
///
/// # Examples
///
/// ```
/// use medium_scout::crawler::accepts_response;
///
/// assert!(accepts_response(200, Some("text/html; charset=utf-8")));
/// assert!(!accepts_response(200, Some("application/pdf")));
/// assert!(!accepts_response(301, Some("text/html")));
/// assert!(!accepts_response(200, None));
/// ```
pub fn accepts_response(status: u16, content_type: Option<&str>) -> bool {
    status == 200
        && content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains(HTML_CONTENT_TYPE))
}

/// Turns a probe response into a [`ProbeOutcome`]
pub fn evaluate_response(status: u16, content_type: Option<&str>) -> ProbeOutcome {
    if accepts_response(status, content_type) {
        return ProbeOutcome::Accepted;
    }

    let reason = match content_type {
        _ if status != 200 => format!("status {}", status),
        Some(ct) => format!("content type {}", ct),
        None => "missing content type".to_string(),
    };

    ProbeOutcome::Rejected { reason }
}

/// Default [`ContentProbe`] issuing HEAD requests
#[derive(Debug, Clone)]
pub struct HeadProbe {
    client: Client,
}

impl HeadProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentProbe for HeadProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return ProbeOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());

        evaluate_response(response.status().as_u16(), content_type)
    }
}
