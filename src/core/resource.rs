//! Loading/error state machine shared by every cache.
//!
//! Each cache moves `Idle -> Loading -> {Succeeded, Failed}`. A failure keeps the
//! previous payload and records a message; a success replaces the payload and clears
//! the message. Nothing retries on its own.
//!
//! Requests are numbered by a [`Sequencer`]. Under
//! [`FetchOrdering::LastCompletedWins`] every completion is admitted, so the response
//! that resolves last is the one left in the cache. Under
//! [`FetchOrdering::DiscardStale`] a completion older than the last admitted one is
//! dropped.
//!
//! Clearing a cache (on logout) starts a new generation. Tickets issued before that
//! are never admitted again, whatever the ordering policy, so a response that was in
//! flight during logout cannot land in the next session's state.

use crate::config::FetchOrdering;
use crate::errors::{Error, Result};
use tracing::debug;

/// Where a cache is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request has been issued and not resolved
    Loading,
    /// The last admitted request succeeded
    Succeeded,
    /// The last admitted request failed
    Failed,
}

/// Identifies one issued request: the cache generation it belongs to and its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket {
    generation: u64,
    seq: u64,
}

/// Hands out request tickets and decides which completions to admit.
#[derive(Debug, Clone)]
pub struct Sequencer {
    ordering: FetchOrdering,
    generation: u64,
    issued: u64,
    applied: Option<u64>,
}

impl Sequencer {
    /// New sequencer with the given ordering policy.
    #[must_use]
    pub const fn new(ordering: FetchOrdering) -> Self {
        Self {
            ordering,
            generation: 0,
            issued: 0,
            applied: None,
        }
    }

    /// Numbers a newly issued request.
    pub const fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket {
            generation: self.generation,
            seq: self.issued,
        }
    }

    /// Orphans every outstanding ticket. Numbering keeps increasing.
    pub const fn advance_generation(&mut self) {
        self.generation += 1;
        self.applied = None;
    }

    /// Records the completion of `ticket` and returns whether it may be applied.
    pub fn admit(&mut self, ticket: RequestTicket) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding response #{} issued before the cache was cleared",
                ticket.seq
            );
            return false;
        }
        let fresh = match self.ordering {
            FetchOrdering::LastCompletedWins => true,
            FetchOrdering::DiscardStale => self.applied.is_none_or(|last| ticket.seq > last),
        };
        if fresh {
            self.applied = Some(ticket.seq);
        } else {
            debug!(
                "Discarding stale response #{} (last applied #{:?})",
                ticket.seq, self.applied
            );
        }
        fresh
    }
}

/// Loading state plus the last error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTracker {
    state: LoadState,
    error: Option<String>,
}

impl LoadTracker {
    /// Marks a request as issued.
    pub const fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Marks the last request as successful and clears the error.
    pub fn succeed(&mut self) {
        self.state = LoadState::Succeeded;
        self.error = None;
    }

    /// Marks the last request as failed with `error`'s message.
    pub fn fail(&mut self, error: &Error) {
        self.state = LoadState::Failed;
        self.error = Some(error.message());
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.state
    }

    /// Last error message, if the cache is failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// A wholesale-replaced cached payload with its load tracker.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    tracker: LoadTracker,
    sequencer: Sequencer,
    data: Option<T>,
}

impl<T> Resource<T> {
    /// Empty, idle resource.
    #[must_use]
    pub const fn new(ordering: FetchOrdering) -> Self {
        Self {
            tracker: LoadTracker {
                state: LoadState::Idle,
                error: None,
            },
            sequencer: Sequencer::new(ordering),
            data: None,
        }
    }

    /// Enters `Loading` and numbers the request.
    pub const fn begin(&mut self) -> RequestTicket {
        self.tracker.begin();
        self.sequencer.issue()
    }

    /// Applies a resolved request. Returns `false` if the response was discarded.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<T>) -> bool {
        if !self.sequencer.admit(ticket) {
            return false;
        }
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.tracker.succeed();
            }
            Err(e) => self.tracker.fail(&e),
        }
        true
    }

    /// Records a failure that happened before any request was issued.
    pub fn reject(&mut self, error: &Error) {
        self.tracker.fail(error);
    }

    /// Drops the payload and error and orphans outstanding requests.
    pub fn clear(&mut self) {
        self.tracker = LoadTracker::default();
        self.sequencer.advance_generation();
        self.data = None;
    }

    /// Cached payload, stale or fresh.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Mutable access for in-place refreshes driven by other responses.
    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    /// Loading/error tracker.
    #[must_use]
    pub const fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }
}
