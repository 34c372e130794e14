//! Client-side reaction state and the vote transition plan
//!
//! A transition is computed from the user's current vote and the button they
//! pressed. It fixes, in order, which atomic counter procedures run, what
//! happens to the vote row, and which counters are re-read afterwards.

use serde::{Deserialize, Serialize};

use super::stats::Aggregate;
use crate::value_objects::{CounterKind, CounterOp, ListingId, VoteType};

/// Locally displayed reaction state for one listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionState {
    pub listing_id: ListingId,
    pub likes: u64,
    pub dislikes: u64,
    pub current_user_vote: Option<VoteType>,
}

impl ReactionState {
    /// State built from seed counts before any authoritative read
    pub fn seeded(listing_id: ListingId, likes: u64, dislikes: u64) -> Self {
        Self {
            listing_id,
            likes,
            dislikes,
            current_user_vote: None,
        }
    }

    /// Overwrite both counters (push notification or full re-read)
    pub fn apply_aggregate(&mut self, aggregate: Aggregate) {
        self.likes = aggregate.likes;
        self.dislikes = aggregate.dislikes;
    }

    /// Overwrite a single reaction counter from an authoritative value
    pub fn set_count(&mut self, vote: VoteType, value: u64) {
        match vote {
            VoteType::Like => self.likes = value,
            VoteType::Dislike => self.dislikes = value,
        }
    }

    pub fn count(&self, vote: VoteType) -> u64 {
        match vote {
            VoteType::Like => self.likes,
            VoteType::Dislike => self.dislikes,
        }
    }

    #[inline]
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::new(self.likes, self.dislikes)
    }
}

/// What happens to the user's vote row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRowChange {
    Insert(VoteType),
    Delete,
    Update(VoteType),
}

/// A like/dislike press resolved against the current vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No prior vote: add one
    Cast(VoteType),
    /// Pressed the same reaction again: remove it
    Retract(VoteType),
    /// Pressed the other reaction: move the vote over
    Switch { from: VoteType, to: VoteType },
}

impl VoteTransition {
    pub fn resolve(current: Option<VoteType>, pressed: VoteType) -> Self {
        match current {
            None => Self::Cast(pressed),
            Some(existing) if existing == pressed => Self::Retract(pressed),
            Some(existing) => Self::Switch {
                from: existing,
                to: pressed,
            },
        }
    }

    /// Atomic counter procedures to run, in issue order
    pub fn counter_steps(self) -> Vec<(CounterKind, CounterOp)> {
        match self {
            Self::Cast(vote) => vec![(vote.counter(), CounterOp::Increment)],
            Self::Retract(vote) => vec![(vote.counter(), CounterOp::Decrement)],
            Self::Switch { from, to } => vec![
                (from.counter(), CounterOp::Decrement),
                (to.counter(), CounterOp::Increment),
            ],
        }
    }

    pub fn row_change(self) -> VoteRowChange {
        match self {
            Self::Cast(vote) => VoteRowChange::Insert(vote),
            Self::Retract(_) => VoteRowChange::Delete,
            Self::Switch { to, .. } => VoteRowChange::Update(to),
        }
    }

    /// The user's vote once the transition completes
    pub fn resulting_vote(self) -> Option<VoteType> {
        match self {
            Self::Cast(vote) => Some(vote),
            Self::Retract(_) => None,
            Self::Switch { to, .. } => Some(to),
        }
    }
}
