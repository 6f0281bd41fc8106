use regex::Regex;
use std::sync::LazyLock;

/// Characters outside ASCII that the grammar accepts in hosts and paths
const UCS_CHARS: &str = r"\x{00A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";

static VALID_URL: LazyLock<Regex> = LazyLock::new(|| {
    let ucs = UCS_CHARS;
    let unreserved = format!(r"[a-z0-9\-._~{ucs}]");
    let alnum = format!("[a-z0-9{ucs}]");
    let alpha = format!("[a-z{ucs}]");
    let pct_encoded = "%[0-9a-f]{2}";
    let sub_delims = r"[!$&'()*+,;=]";
    let octet = "(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])";

    let userinfo = format!("(?:{unreserved}|{pct_encoded}|{sub_delims}|:)*@");
    let ipv4 = format!(r"{octet}\.{octet}\.{octet}\.{octet}");
    let label = format!("(?:{alnum}|{alnum}{unreserved}*{alnum})");
    let top_label = format!("(?:{alpha}|{alpha}{unreserved}*{alpha})");
    let hostname = format!(r"(?:{label}\.)+{top_label}\.?");
    let pchar = format!("(?:{unreserved}|{pct_encoded}|{sub_delims}|:|@)");
    let path = format!("(?:/(?:{pchar}+(?:/{pchar}*)*)?)?");
    let query = format!(r"(?:\?(?:{pchar}|[\x{{E000}}-\x{{F8FF}}]|/|\?)*)?");
    let fragment = format!(r"(?:#(?:{pchar}|/|\?)*)?");

    let pattern = format!(
        "(?i)^(?:https?|ftp)://(?:{userinfo})?(?:{ipv4}|{hostname})(?::[0-9]*)?{path}{query}{fragment}$"
    );

    Regex::new(&pattern).expect("URL grammar must compile")
});

/// Checks whether a string is a complete, absolute URL
///
/// Accepts `http`, `https` and `ftp` URLs with an optional userinfo, a host
/// given as an IPv4 address or a dotted hostname, an optional port and an
/// optional path, query and fragment. Anything else is rejected.
///
/// # Examples
///
/// ```
/// use medium_scout::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/path?q=1#top"));
/// assert!(!is_valid_url("example.com/path"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    VALID_URL.is_match(url)
}
