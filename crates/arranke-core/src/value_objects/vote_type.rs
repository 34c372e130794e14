//! Reaction kinds a user can cast on a listing

use serde::{Deserialize, Serialize};
use std::fmt;

use super::CounterKind;

/// A user's reaction to a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Like,
    Dislike,
}

impl VoteType {
    /// Stored representation (`user_votes.vote_type`)
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// The other reaction
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// Aggregate counter that tracks this reaction
    pub const fn counter(self) -> CounterKind {
        match self {
            Self::Like => CounterKind::Likes,
            Self::Dislike => CounterKind::Dislikes,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoteType {
    type Err = VoteTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(VoteTypeParseError(other.to_string())),
        }
    }
}

/// Error when a stored vote type is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vote type: {0}")]
pub struct VoteTypeParseError(pub String);
