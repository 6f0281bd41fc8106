//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitState`: Tracks admitted URLs (in flight or done)
//! - `CrawlPhase`: Tracks the phase of the whole crawl session

mod crawl_phase;
mod visit_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use visit_state::VisitState;
