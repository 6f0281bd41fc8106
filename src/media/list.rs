use crate::media::matcher::MediumMatcher;
use crate::ConfigResult;

/// Medium prefixes used when the caller does not supply a list
pub const DEFAULT_MEDIA: &[&str] = &[
    "facebook.com/",
    "fb.com/",
    "twitter.com/",
    // A bare `x.com/` would match every host ending in `x`
    "//x.com/",
    "instagram.com/",
    "linkedin.com/",
    "youtube.com/",
    "youtu.be/",
    "pinterest.com/",
    "tumblr.com/",
    "plus.google.com/",
    "vk.com/",
    "xing.com/",
    "flickr.com/",
    "vimeo.com/",
    "tiktok.com/@",
    "github.com/",
];

/// Ordered list of medium prefixes
///
/// The list starts from [`DEFAULT_MEDIA`] and can be edited before a crawl
/// starts. Insertion order is preserved and duplicates are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumList {
    media: Vec<String>,
}

impl MediumList {
    /// Creates a list from the given prefixes
    pub fn new<I, S>(media: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::empty();
        list.extend(media);
        list
    }

    /// Creates a list without any prefix
    pub fn empty() -> Self {
        Self { media: Vec::new() }
    }

    /// Adds a single medium prefix
    ///
    /// Returns true if the prefix was not already in the list.
    pub fn add(&mut self, medium: impl Into<String>) -> bool {
        let medium = medium.into();
        if self.media.contains(&medium) {
            return false;
        }
        self.media.push(medium);
        true
    }

    /// Adds several medium prefixes in order
    pub fn extend<I, S>(&mut self, media: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for medium in media {
            self.add(medium);
        }
    }

    /// Removes a single medium prefix
    ///
    /// Returns true if the prefix was present.
    pub fn remove(&mut self, medium: &str) -> bool {
        let before = self.media.len();
        self.media.retain(|m| m != medium);
        self.media.len() != before
    }

    /// Removes every listed prefix
    pub fn remove_all<I, S>(&mut self, media: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doomed: Vec<S> = media.into_iter().collect();
        self.media
            .retain(|m| !doomed.iter().any(|d| d.as_ref() == m.as_str()));
    }

    pub fn contains(&self, medium: &str) -> bool {
        self.media.iter().any(|m| m == medium)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.media
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    /// Compiles the current prefixes into a matcher
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the prefixes do not compile.
    pub fn matcher(&self) -> ConfigResult<MediumMatcher> {
        MediumMatcher::new(&self.media)
    }
}

impl Default for MediumList {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA.iter().copied())
    }
}
