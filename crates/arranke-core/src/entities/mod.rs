//! Domain entities - core business objects

mod identity;
mod listing;
mod profile;
mod reaction;
mod stats;
mod vote;

pub use identity::Identity;
pub use listing::{Listing, ModerationStatus, ModerationStatusParseError};
pub use profile::{resolve_display_name, DisplayNamePreference, Profile, FALLBACK_DISPLAY_NAME};
pub use reaction::{ReactionState, VoteRowChange, VoteTransition};
pub use stats::{Aggregate, ListingStats};
pub use vote::UserVote;
