use crate::url::normalize::{
    extract_domain, extract_extension, extract_protocol, is_supported_extension, is_under_rss,
};
use crate::url::validate::is_valid_url;

/// Protocol and domain of the page a link was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme including the trailing colon, e.g. `https:`
    pub protocol: String,

    /// Domain without a leading `www.`
    pub domain: String,
}

impl PageLocation {
    /// Creates a location from its parts
    pub fn new(protocol: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            domain: domain.into(),
        }
    }
}

/// A link resolved to an absolute URL with its extracted parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// The absolute URL
    pub url: String,

    /// Scheme including the trailing colon
    pub protocol: String,

    /// Domain without a leading `www.`
    pub domain: String,

    /// Extension of the last path segment, or an empty string
    pub extension: String,
}

impl ResolvedLink {
    /// Parses an absolute URL that passes [`is_valid_url`]
    ///
    /// Returns `None` for anything that is not a valid absolute URL.
    pub fn from_absolute(url: &str) -> Option<Self> {
        if !is_valid_url(url) {
            return None;
        }

        Some(Self {
            url: url.to_string(),
            protocol: extract_protocol(url)?,
            domain: extract_domain(url)?,
            extension: extract_extension(url),
        })
    }

    /// Returns the protocol and domain of this link
    pub fn location(&self) -> PageLocation {
        PageLocation::new(self.protocol.clone(), self.domain.clone())
    }

    /// Returns true if this link points at something the crawler may scan
    ///
    /// Navigable links have a supported extension and are not under an
    /// `rss` path segment. Domain checks are left to the caller.
    pub fn is_navigable(&self) -> bool {
        is_supported_extension(&self.extension) && !is_under_rss(&self.url)
    }
}

/// Resolves a normalized href against the page it was found on
///
/// # Resolution Rules
///
/// 1. A valid absolute URL is taken as-is
/// 2. A bare path (no `:` anywhere, not starting with `#`) is joined to the
///    base page's protocol and domain, with a leading `/` injected if missing
/// 3. Everything else (fragment-only links, `mailto:`, `javascript:`,
///    malformed absolute URLs) does not resolve
///
/// # Examples
///
/// ```
/// use medium_scout::url::{resolve, PageLocation};
///
/// let base = PageLocation::new("http:", "a.com");
/// assert_eq!(resolve("/x", &base).unwrap().url, "http://a.com/x");
/// assert_eq!(resolve("x", &base).unwrap().url, "http://a.com/x");
/// assert!(resolve("#top", &base).is_none());
/// ```
pub fn resolve(candidate: &str, base: &PageLocation) -> Option<ResolvedLink> {
    if is_valid_url(candidate) {
        return ResolvedLink::from_absolute(candidate);
    }

    if candidate.is_empty() || candidate.contains(':') || candidate.starts_with('#') {
        return None;
    }

    let url = if candidate.starts_with('/') {
        format!("{}//{}{}", base.protocol, base.domain, candidate)
    } else {
        format!("{}//{}/{}", base.protocol, base.domain, candidate)
    };

    Some(ResolvedLink {
        extension: extract_extension(&url),
        protocol: base.protocol.clone(),
        domain: base.domain.clone(),
        url,
    })
}
