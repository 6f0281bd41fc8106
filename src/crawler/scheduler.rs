//! Scheduler for managing the crawl frontier and the page budget
//!
//! This module handles:
//! - The frontier of discovered but not yet admitted URLs
//! - The visit map of admitted URLs (in flight or done)
//! - Blocked URLs (caller block list, content rejections, skips), which
//!   leave the visit map and no longer count against the budget
//! - The concurrency cap and the page budget

use crate::state::{CrawlPhase, VisitState};
use crate::url::BlockList;
use std::collections::{HashMap, HashSet};

/// Result of asking the scheduler for the next URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The URL was moved from the frontier into the visit map
    Admit(String),

    /// Too many URLs are in flight; try again on the next tick
    AtCapacity,

    /// The page budget is exhausted; nothing more will be admitted
    BudgetReached,

    /// The frontier holds nothing eligible right now
    Idle,
}

/// Scheduler manages the frontier, the visit map and admission
///
/// Every URL moves through `frontier -> in flight -> done` or ends up
/// blocked. A URL is admitted at most once and the number of admitted URLs
/// never exceeds the page budget.
#[derive(Debug)]
pub struct Scheduler {
    /// Discovered URLs in discovery order
    frontier: Vec<String>,

    /// Members of `frontier`, for constant-time lookups
    queued: HashSet<String>,

    /// Admitted URLs and their state
    visits: HashMap<String, VisitState>,

    /// URLs blocked during the crawl
    blocked: HashSet<String>,

    /// Blocked URLs in the order they were blocked
    blocked_order: Vec<String>,

    /// Caller-supplied block list
    block_list: BlockList,

    /// Number of admitted URLs not yet done
    in_flight: usize,

    /// Maximum number of admitted URLs
    max_pages: usize,

    /// Maximum number of URLs in flight at once
    max_concurrency: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_pages` - The page budget (at least 1)
    /// * `max_concurrency` - How many URLs may be in flight at once (at least 1)
    /// * `block_list` - URLs and paths that must never be admitted
    pub fn new(max_pages: usize, max_concurrency: usize, block_list: BlockList) -> Self {
        Self {
            frontier: Vec::new(),
            queued: HashSet::new(),
            visits: HashMap::new(),
            blocked: HashSet::new(),
            blocked_order: Vec::new(),
            block_list,
            in_flight: 0,
            max_pages: max_pages.max(1),
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Admits the entry URL directly, bypassing the frontier and block list
    ///
    /// Returns false if the URL was already admitted.
    pub fn admit_entry(&mut self, url: &str) -> bool {
        if self.visits.contains_key(url) {
            return false;
        }

        self.visits.insert(url.to_string(), VisitState::InFlight);
        self.in_flight += 1;
        true
    }

    /// Adds newly discovered links to the frontier
    ///
    /// Links already queued, admitted or blocked are ignored, as are links
    /// covered by the block list.
    ///
    /// # Returns
    ///
    /// The number of links actually added
    pub fn enqueue<I, S>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;

        for link in links {
            let link = link.as_ref();

            if self.is_known(link) || self.block_list.matches(link) {
                continue;
            }

            self.queued.insert(link.to_string());
            self.frontier.push(link.to_string());
            added += 1;
        }

        added
    }

    /// Tries to admit the next eligible frontier URL
    ///
    /// The capacity check comes first, then the budget. The oldest eligible
    /// URL is admitted.
    pub fn next_admission(&mut self) -> Admission {
        if self.at_capacity() {
            return Admission::AtCapacity;
        }

        if self.budget_reached() {
            return Admission::BudgetReached;
        }

        let Some(index) = self.frontier.iter().position(|url| self.is_eligible(url)) else {
            return Admission::Idle;
        };

        let url = self.frontier.remove(index);
        self.queued.remove(&url);
        self.visits.insert(url.clone(), VisitState::InFlight);
        self.in_flight += 1;

        Admission::Admit(url)
    }

    /// Marks an in-flight URL as done
    ///
    /// Returns false if the URL was not in flight.
    pub fn complete(&mut self, url: &str) -> bool {
        match self.visits.get_mut(url) {
            Some(state @ VisitState::InFlight) => {
                *state = VisitState::Done;
                self.in_flight -= 1;
                true
            }
            _ => false,
        }
    }

    /// Blocks a URL for the rest of the crawl
    ///
    /// The URL leaves the frontier and the visit map. An in-flight URL
    /// releases both its slot and its share of the page budget.
    ///
    /// Returns false if the URL was already blocked.
    pub fn block(&mut self, url: &str) -> bool {
        if !self.blocked.insert(url.to_string()) {
            return false;
        }

        self.blocked_order.push(url.to_string());

        if self.queued.remove(url) {
            self.frontier.retain(|queued| queued != url);
        }

        if self.visits.remove(url) == Some(VisitState::InFlight) {
            self.in_flight -= 1;
        }

        true
    }

    /// Returns true if the URL was queued, admitted or blocked
    pub fn is_known(&self, url: &str) -> bool {
        self.queued.contains(url) || self.visits.contains_key(url) || self.blocked.contains(url)
    }

    /// Returns true if the URL is blocked, by the crawl or by the block list
    pub fn is_blocked(&self, url: &str) -> bool {
        self.blocked.contains(url) || self.block_list.matches(url)
    }

    fn is_eligible(&self, url: &str) -> bool {
        !self.visits.contains_key(url) && !self.is_blocked(url)
    }

    /// Returns true if any frontier URL could be admitted
    pub fn has_eligible(&self) -> bool {
        self.frontier.iter().any(|url| self.is_eligible(url))
    }

    pub fn at_capacity(&self) -> bool {
        self.in_flight >= self.max_concurrency
    }

    pub fn budget_reached(&self) -> bool {
        self.visits.len() >= self.max_pages
    }

    /// Returns true once nothing is in flight and nothing can be admitted
    pub fn is_finished(&self) -> bool {
        self.in_flight == 0 && (self.budget_reached() || !self.has_eligible())
    }

    /// Derives the crawl phase from the scheduling state
    pub fn phase(&self) -> CrawlPhase {
        if self.visits.is_empty() {
            CrawlPhase::Idle
        } else if self.is_finished() {
            CrawlPhase::Done
        } else if !self.budget_reached() && self.has_eligible() {
            CrawlPhase::Running
        } else {
            CrawlPhase::Draining
        }
    }

    /// Returns the state of an admitted URL
    pub fn visit_state(&self, url: &str) -> Option<VisitState> {
        self.visits.get(url).copied()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Number of URLs admitted so far
    pub fn admitted(&self) -> usize {
        self.visits.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// URLs blocked during the crawl, in blocking order
    pub fn blocked(&self) -> &[String] {
        &self.blocked_order
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}
