/// Crawl phase definitions for the scheduling state machine
///
/// ```text
/// Idle -> Running <-> Draining -> Done
/// Idle -> Draining
/// Idle -> Done
/// Running -> Done
/// ```
use std::fmt;

/// Represents the phase of a whole crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// The session exists but the entry page has not been scanned yet
    Idle,

    /// URLs can still be admitted from the frontier
    Running,

    /// Nothing can be admitted right now, but fetches are still in flight
    Draining,

    /// Nothing is in flight and nothing more can be admitted
    Done,
}

impl CrawlPhase {
    /// Returns true once the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the scheduler should keep ticking in this phase
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Draining)
    }

    /// Checks whether moving from this phase to `next` is allowed
    ///
    /// Staying in the same phase is always allowed. `Done` is final.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Draining)
                | (Self::Idle, Self::Done)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Running)
                | (Self::Draining, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
