//! What a like/dislike press did

use std::fmt;

use arranke_core::{CounterKind, CounterOp, VoteType};

/// Remote step of a vote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerStep {
    /// Reading the vote row for a voter the ledger has not seen yet
    ReadVote,
    Counter(CounterKind, CounterOp),
    VoteRow,
    /// Reading the aggregate back after the mutation
    Reread,
}

impl fmt::Display for LedgerStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadVote => f.write_str("read_vote"),
            Self::Counter(kind, op) => match kind.procedure(*op) {
                Some(procedure) => f.write_str(procedure),
                None => write!(f, "{op}_{kind}"),
            },
            Self::VoteRow => f.write_str("vote_row"),
            Self::Reread => f.write_str("reread"),
        }
    }
}

/// Why a press made no remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No signed-in user; the login prompt is shown
    Unauthenticated,
    /// Another mutation on this ledger is in flight
    Busy,
    /// The ledger was torn down
    Released,
}

/// Result of `like()` / `dislike()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Every step succeeded; `vote` is the user's vote now
    Applied { vote: Option<VoteType> },
    Rejected(Rejection),
    /// The first remote step failed; nothing changed remotely or locally
    Failed { step: LedgerStep },
    /// `step` failed after earlier mutations landed; they are not rolled back
    Partial { step: LedgerStep },
}

impl VoteOutcome {
    pub(crate) fn stopped(step: LedgerStep, mutated: bool) -> Self {
        if mutated {
            Self::Partial { step }
        } else {
            Self::Failed { step }
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The failed step, if the press stopped on a remote failure
    pub fn failed_step(&self) -> Option<LedgerStep> {
        match self {
            Self::Failed { step } | Self::Partial { step } => Some(*step),
            _ => None,
        }
    }
}
