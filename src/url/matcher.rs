use crate::url::normalize::normalize_href;

/// Checks if a URL is covered by a block-list entry
///
/// An entry matches a URL when it is:
/// 1. The URL itself: "http://a.com/private" matches only that URL
/// 2. The last path segment with its slash: "/private" matches "http://a.com/private"
/// 3. The last path segment without its slash: "private" matches "http://a.com/private"
///
/// Entries are compared as given; callers normalize them first.
///
/// # Examples
///
/// ```
/// use medium_scout::url::matches_blocked;
///
/// assert!(matches_blocked("http://a.com/login", "http://a.com/login"));
/// assert!(matches_blocked("/login", "http://a.com/account/login"));
/// assert!(matches_blocked("login", "http://a.com/login"));
/// assert!(!matches_blocked("/account", "http://a.com/account/login"));
/// ```
pub fn matches_blocked(entry: &str, url: &str) -> bool {
    if entry == url {
        return true;
    }

    let Some((_, rest)) = url.split_once("://") else {
        return false;
    };

    match rest.rfind('/') {
        Some(idx) => {
            let with_slash = &rest[idx..];
            let bare = &rest[idx + 1..];
            entry == with_slash || (!bare.is_empty() && entry == bare)
        }
        None => false,
    }
}

/// Caller-supplied URLs and paths that must never be scanned
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    entries: Vec<String>,
}

impl BlockList {
    /// Creates an empty block list
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry; entries that normalize to nothing are ignored
    ///
    /// Returns true if the entry was added.
    pub fn push(&mut self, entry: &str) -> bool {
        match normalize_href(entry) {
            Some(normalized) if !self.entries.contains(&normalized) => {
                self.entries.push(normalized);
                true
            }
            _ => false,
        }
    }

    /// Returns true if any entry covers the URL
    pub fn matches(&self, url: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| matches_blocked(entry, url))
    }

    /// Returns the entries in insertion order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for BlockList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.push(entry.as_ref());
        }
        list
    }
}
