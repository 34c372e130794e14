//! Value objects - immutable types that represent domain concepts

mod counter;
mod ids;
mod vote_type;

pub use counter::{CounterKind, CounterOp};
pub use ids::{IdParseError, ListingId, UserId};
pub use vote_type::{VoteType, VoteTypeParseError};
