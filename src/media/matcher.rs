use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Builds the fuzzy pattern fragment for one medium prefix
///
/// # Algorithm
///
/// 1. `-`, `_` and whitespace become `.`, so `you-tube` and `you tube` match alike
/// 2. Every other character with a special meaning is escaped; `.` stays a wildcard
/// 3. A prefix made of two labels whose first label has at most three characters
///    (`fb.com/`, `vk.com/`) is used literally: fuzzing such short hosts would
///    match far too much
/// 4. Otherwise the fragment is the alternation of every variant with exactly one
///    character replaced by `.`
///
/// # Examples
///
/// ```
/// use medium_scout::media::fuzzy_pattern;
///
/// assert_eq!(
///     fuzzy_pattern("abcd.e/"),
///     ".bcd.e/|a.cd.e/|ab.d.e/|abc..e/|abcd.e/|abcd../|abcd.e."
/// );
/// assert_eq!(fuzzy_pattern("fb.com/"), "fb.com/");
/// ```
pub fn fuzzy_pattern(prefix: &str) -> String {
    let normalized: String = prefix
        .chars()
        .map(|c| {
            if c == '-' || c == '_' || c.is_whitespace() {
                '.'
            } else {
                c
            }
        })
        .collect();

    let units: Vec<String> = normalized.chars().map(escape_char).collect();

    let labels: Vec<&str> = normalized.split('.').collect();
    if labels.len() == 2 && labels[0].chars().count() <= 3 {
        return units.concat();
    }

    (0..units.len())
        .map(|i| format!("{}.{}", units[..i].concat(), units[i + 1..].concat()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Escapes one character, keeping `.` as a single-character wildcard
fn escape_char(c: char) -> String {
    if c == '.' {
        ".".to_string()
    } else {
        regex::escape(c.encode_utf8(&mut [0; 4]))
    }
}

/// Decides whether a link points at a social-media profile or page
///
/// The matcher compiles every medium prefix into one unanchored expression
/// and optionally carries a caller-supplied custom expression. A link is a
/// medium if either of them matches.
#[derive(Debug, Clone)]
pub struct MediumMatcher {
    pattern: Option<Regex>,
    custom: Option<Regex>,
}

impl MediumMatcher {
    /// Compiles a matcher from a list of medium prefixes
    ///
    /// Empty prefixes are ignored. An empty list yields a matcher that only
    /// matches through a custom pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the combined expression does
    /// not compile.
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> ConfigResult<Self> {
        let fragments: Vec<String> = prefixes
            .iter()
            .map(|prefix| prefix.as_ref())
            .filter(|prefix| !prefix.trim().is_empty())
            .map(fuzzy_pattern)
            .collect();

        let pattern = if fragments.is_empty() {
            None
        } else {
            let source = format!("/*(?:{})(.*)", fragments.join("|"));
            let regex = Regex::new(&source).map_err(|e| {
                ConfigError::InvalidPattern(format!("Failed to compile medium list: {}", e))
            })?;
            Some(regex)
        };

        Ok(Self {
            pattern,
            custom: None,
        })
    }

    /// Adds a custom expression that also marks links as media
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the expression does not compile.
    pub fn with_custom_pattern(mut self, pattern: &str) -> ConfigResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid custom pattern '{}': {}", pattern, e))
        })?;
        self.custom = Some(regex);
        Ok(self)
    }

    /// Returns true if the link is classified as a medium
    pub fn is_medium(&self, url: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(url))
            || self.custom.as_ref().is_some_and(|re| re.is_match(url))
    }

    /// Returns the compiled prefix expression, if any prefix was given
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}
