//! Link classification
//!
//! Sorts the raw hrefs of one page into media (social-media links) and
//! same-domain links worth crawling.

use crate::media::MediumMatcher;
use crate::url::{normalize_href, resolve, PageLocation};
use std::collections::HashSet;

/// Media and crawlable links found on a single page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Social-media links, in first-seen order
    pub media: Vec<String>,

    /// Absolute same-domain links, in first-seen order
    pub links: Vec<String>,
}

/// Classifies the raw hrefs of a page
///
/// # Classification Rules
///
/// For each href, after normalization (trim, strip one trailing `/`):
/// 1. If it is not yet one of this page's media and the matcher accepts it,
///    it is a medium
/// 2. Otherwise it is resolved against `base`; it is a link if it resolves,
///    its domain equals `crawl_domain`, its extension is supported and it is
///    not under an `rss` path segment
/// 3. Anything else is dropped
///
/// # Arguments
///
/// * `base` - Protocol and domain of the page the hrefs were found on
/// * `crawl_domain` - Domain of the crawl's entry URL
/// * `hrefs` - Raw hrefs in document order
/// * `matcher` - The medium matcher
///
/// # Example
///
/// ```
/// use medium_scout::crawler::classify;
/// use medium_scout::media::MediumList;
/// use medium_scout::url::PageLocation;
///
/// let matcher = MediumList::default().matcher().unwrap();
/// let base = PageLocation::new("http:", "a.com");
/// let hrefs = ["/about", "http://facebook.com/a", "#top", "http://b.com/x"];
///
/// let classified = classify(&base, "a.com", &hrefs, &matcher);
/// assert_eq!(classified.links, vec!["http://a.com/about"]);
/// assert_eq!(classified.media, vec!["http://facebook.com/a"]);
/// ```
pub fn classify<S: AsRef<str>>(
    base: &PageLocation,
    crawl_domain: &str,
    hrefs: &[S],
    matcher: &MediumMatcher,
) -> Classified {
    let mut classified = Classified::default();
    let mut media_seen = HashSet::new();
    let mut links_seen = HashSet::new();

    for raw in hrefs {
        let Some(href) = normalize_href(raw.as_ref()) else {
            continue;
        };

        if !media_seen.contains(&href) && matcher.is_medium(&href) {
            tracing::trace!("Medium: {}", href);
            media_seen.insert(href.clone());
            classified.media.push(href);
            continue;
        }

        let Some(link) = resolve(&href, base) else {
            tracing::trace!("Unresolvable href: {}", href);
            continue;
        };

        if link.domain != crawl_domain || !link.is_navigable() {
            continue;
        }

        if links_seen.insert(link.url.clone()) {
            classified.links.push(link.url);
        }
    }

    classified
}
