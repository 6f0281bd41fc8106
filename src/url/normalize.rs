/// Path extensions that identify a page worth following
///
/// The empty string covers extension-less paths such as `/about`.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["", ".htm", ".html", ".php"];

/// Normalizes a raw href before comparison or storage
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Remove one trailing slash, so `/a` and `/a/` share a key
/// 3. Drop the href entirely if nothing is left
///
/// # Examples
///
/// ```
/// use medium_scout::url::normalize_href;
///
/// assert_eq!(normalize_href("  /about/ "), Some("/about".to_string()));
/// assert_eq!(normalize_href("https://example.com/"), Some("https://example.com".to_string()));
/// assert_eq!(normalize_href("   "), None);
/// ```
pub fn normalize_href(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('/').unwrap_or(trimmed);

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Extracts the scheme of an absolute URL, lowercased, including the trailing colon
///
/// Returns `None` when there is no `scheme://` prefix.
pub fn extract_protocol(url: &str) -> Option<String> {
    let (scheme, _) = url.split_once("://")?;

    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(format!("{}:", scheme.to_ascii_lowercase()))
}

/// Extracts the domain of an absolute URL
///
/// The domain is the lowercased authority without userinfo and without a
/// leading `www.`. A port, if present, is kept.
pub fn extract_domain(url: &str) -> Option<String> {
    let authority = authority_of(url)?;
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .to_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Extracts the path extension of an absolute URL
///
/// The extension is the last dot-delimited suffix of the last path segment,
/// including the dot. Query strings and fragments are ignored. Returns an
/// empty string when the last segment has no dot.
///
/// # Examples
///
/// ```
/// use medium_scout::url::extract_extension;
///
/// assert_eq!(extract_extension("https://example.com/docs/index.html"), ".html");
/// assert_eq!(extract_extension("https://example.com/about?v=1.2"), "");
/// assert_eq!(extract_extension("https://example.com"), "");
/// ```
pub fn extract_extension(url: &str) -> String {
    let path = path_of(url);
    let last_segment = path.rsplit('/').next().unwrap_or("");

    last_segment
        .rfind('.')
        .map(|idx| last_segment[idx..].to_string())
        .unwrap_or_default()
}

/// Returns true if links with this extension may be crawled
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(extension))
}

/// Returns true if any path segment of the URL is named `rss`
pub fn is_under_rss(url: &str) -> bool {
    path_of(url)
        .split('/')
        .any(|segment| segment.eq_ignore_ascii_case("rss"))
}

/// Returns the authority section (`user@host:port`) of an absolute URL
fn authority_of(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Returns the path of an absolute URL without query or fragment
fn path_of(url: &str) -> &str {
    let Some((_, rest)) = url.split_once("://") else {
        return "";
    };
    let rest = &rest[..rest.find(['?', '#']).unwrap_or(rest.len())];
    rest.find('/').map_or("", |idx| &rest[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_href_trims_and_strips_slash() {
        assert_eq!(normalize_href("/a/"), Some("/a".to_string()));
        assert_eq!(normalize_href("/a"), Some("/a".to_string()));
        assert_eq!(normalize_href("\t/a \n"), Some("/a".to_string()));
    }

    #[test]
    fn test_normalize_href_strips_only_one_slash() {
        assert_eq!(normalize_href("/a//"), Some("/a/".to_string()));
    }

    #[test]
    fn test_normalize_href_empty() {
        assert_eq!(normalize_href(""), None);
        assert_eq!(normalize_href("/"), None);
        assert_eq!(normalize_href("  / "), None);
    }

    #[test]
    fn test_extract_protocol() {
        assert_eq!(extract_protocol("http://a.com"), Some("http:".to_string()));
        assert_eq!(extract_protocol("HTTPS://a.com/x"), Some("https:".to_string()));
        assert_eq!(extract_protocol("ftp://a.com"), Some("ftp:".to_string()));
        assert_eq!(extract_protocol("/relative"), None);
        assert_eq!(extract_protocol("mailto:a@b.com"), None);
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("http://a.com/x"), Some("a.com".to_string()));
        assert_eq!(extract_domain("http://www.a.com/x"), Some("a.com".to_string()));
        assert_eq!(extract_domain("http://WWW.A.COM"), Some("a.com".to_string()));
        assert_eq!(
            extract_domain("http://blog.a.com?q=1"),
            Some("blog.a.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_keeps_port_and_drops_userinfo() {
        assert_eq!(
            extract_domain("http://127.0.0.1:8080/page"),
            Some("127.0.0.1:8080".to_string())
        );
        assert_eq!(
            extract_domain("ftp://user:pw@files.a.com/pub"),
            Some("files.a.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_without_scheme() {
        assert_eq!(extract_domain("a.com/x"), None);
        assert_eq!(extract_domain("http:///x"), None);
    }

    #[test]
    fn test_extract_extension() {
        assert_eq!(extract_extension("http://a.com"), "");
        assert_eq!(extract_extension("http://a.com/about"), "");
        assert_eq!(extract_extension("http://a.com/index.html"), ".html");
        assert_eq!(extract_extension("http://a.com/index.php?id=1.5"), ".php");
        assert_eq!(extract_extension("http://a.com/files/report.pdf#p2"), ".pdf");
        assert_eq!(extract_extension("http://a.com/v1.2/about"), "");
        assert_eq!(extract_extension("http://a.com/archive.tar.gz"), ".gz");
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension(""));
        assert!(is_supported_extension(".htm"));
        assert!(is_supported_extension(".html"));
        assert!(is_supported_extension(".HTML"));
        assert!(is_supported_extension(".php"));
        assert!(!is_supported_extension(".pdf"));
        assert!(!is_supported_extension(".xml"));
    }

    #[test]
    fn test_is_under_rss() {
        assert!(is_under_rss("http://a.com/rss"));
        assert!(is_under_rss("http://a.com/blog/RSS/feed"));
        assert!(!is_under_rss("http://a.com/rss-news"));
        assert!(!is_under_rss("http://a.com/about?format=rss"));
        assert!(!is_under_rss("http://rss.a.com/about"));
    }
}
