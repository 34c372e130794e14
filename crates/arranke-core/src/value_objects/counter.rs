//! Aggregate counters kept in `listing_stats`
//!
//! Counters are only ever adjusted through the store's atomic procedures;
//! each (kind, op) pair names exactly one procedure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A counter column on the aggregate row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    Likes,
    Dislikes,
    Visits,
    Clicks,
}

/// Direction of an atomic adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterOp {
    Increment,
    Decrement,
}

impl CounterKind {
    /// Column name on `listing_stats`
    pub const fn column(self) -> &'static str {
        match self {
            Self::Likes => "likes_count",
            Self::Dislikes => "dislikes_count",
            Self::Visits => "visit_count",
            Self::Clicks => "clicks_count",
        }
    }

    /// Name of the remote procedure performing `op` on this counter
    ///
    /// Visits and clicks only ever grow, so they have no decrement procedure.
    pub const fn procedure(self, op: CounterOp) -> Option<&'static str> {
        match (self, op) {
            (Self::Likes, CounterOp::Increment) => Some("increment_likes"),
            (Self::Likes, CounterOp::Decrement) => Some("decrement_likes"),
            (Self::Dislikes, CounterOp::Increment) => Some("increment_dislikes"),
            (Self::Dislikes, CounterOp::Decrement) => Some("decrement_dislikes"),
            (Self::Visits, CounterOp::Increment) => Some("increment_visits"),
            (Self::Clicks, CounterOp::Increment) => Some("increment_clicks"),
            (Self::Visits | Self::Clicks, CounterOp::Decrement) => None,
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for CounterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => f.write_str("increment"),
            Self::Decrement => f.write_str("decrement"),
        }
    }
}
