//! Explicit state machine for one search session.
//!
//! The session holds exactly one user-visible phase at a time: idle, a
//! spinner, a result list, a no-results notice, or a failure notice. A new
//! search submitted while one is in flight invalidates the older one; a
//! completion arriving with a stale token is dropped. That makes the
//! overlapping-search race a stated policy (latest submission wins) instead
//! of whichever response happens to land last.

use crate::parse::RestaurantRecord;

/// Token tying an in-flight search to the submission that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToken(u64);

/// What the user currently sees
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPhase {
    /// No search performed yet, or the session was reset
    Idle,
    /// A search is in flight
    Searching,
    /// A completed search with at least one grounded result
    Loaded {
        /// The assembled records, in citation order
        results: Vec<RestaurantRecord>,
        /// Id of the record open in the detail view, if any
        selected: Option<String>,
    },
    /// A completed search with no grounded places
    NoResults,
    /// The search failed outright
    Failed {
        /// Message for the generic error notice
        message: String,
    },
}

/// State for one search session
#[derive(Debug)]
pub struct SearchSession {
    phase: SearchPhase,
    generation: u64,
}

impl SearchSession {
    /// Create a session in the idle phase
    pub fn new() -> Self {
        Self {
            phase: SearchPhase::Idle,
            generation: 0,
        }
    }

    /// The current phase
    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Begin a new search
    ///
    /// Moves to `Searching` and returns the token the eventual completion
    /// must present. Any token issued earlier becomes stale.
    pub fn submit(&mut self) -> SearchToken {
        self.generation += 1;
        self.phase = SearchPhase::Searching;
        SearchToken(self.generation)
    }

    /// Record a successful completion
    ///
    /// An empty result list lands in `NoResults`. Stale tokens are ignored.
    pub fn succeed(&mut self, token: SearchToken, results: Vec<RestaurantRecord>) {
        if token.0 != self.generation {
            return;
        }
        self.phase = if results.is_empty() {
            SearchPhase::NoResults
        } else {
            SearchPhase::Loaded {
                results,
                selected: None,
            }
        };
    }

    /// Record a failed completion. Stale tokens are ignored.
    pub fn fail(&mut self, token: SearchToken, message: impl Into<String>) {
        if token.0 != self.generation {
            return;
        }
        self.phase = SearchPhase::Failed {
            message: message.into(),
        };
    }

    /// Return to idle and invalidate any in-flight search
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = SearchPhase::Idle;
    }

    /// Open the detail view for a record
    ///
    /// Only valid while results are shown; unknown ids are ignored.
    pub fn select(&mut self, id: &str) {
        if let SearchPhase::Loaded { results, selected } = &mut self.phase {
            if results.iter().any(|r| r.id == id) {
                *selected = Some(id.to_string());
            }
        }
    }

    /// Close the detail view
    pub fn deselect(&mut self) {
        if let SearchPhase::Loaded { selected, .. } = &mut self.phase {
            *selected = None;
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
