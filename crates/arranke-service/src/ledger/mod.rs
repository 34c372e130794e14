//! Reaction ledger client
//!
//! Per-listing like/dislike state for the signed-in user, reconciled against
//! the store after every mutation and kept fresh by aggregate pushes.

mod outcome;
mod prompt;
mod reaction_ledger;

pub use outcome::{LedgerStep, Rejection, VoteOutcome};
pub use prompt::LoginPrompt;
pub use reaction_ledger::ReactionLedger;
