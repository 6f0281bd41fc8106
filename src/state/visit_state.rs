/// Visit state definitions for tracking scheduled URLs
///
/// A URL enters the visit map exactly once, when it is admitted.
use std::fmt;

/// Represents the scheduling state of an admitted URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitState {
    /// The URL is being probed, fetched or classified
    InFlight,

    /// The URL has been scanned (successfully or with a terminal error)
    Done,
}

impl VisitState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the lowercase name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InFlight => "in-flight",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
