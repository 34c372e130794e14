//! User vote entity <-> model mapper

use arranke_core::entities::UserVote;
use arranke_core::error::DomainError;
use arranke_core::value_objects::{ListingId, UserId};

use crate::models::UserVoteModel;

impl TryFrom<UserVoteModel> for UserVote {
    type Error = DomainError;

    fn try_from(model: UserVoteModel) -> Result<Self, Self::Error> {
        let vote_type = model
            .vote_type
            .parse()
            .map_err(|e| DomainError::DatabaseError(format!("user vote: {e}")))?;

        Ok(UserVote {
            listing_id: ListingId::new(model.listing_id),
            user_id: UserId::new(model.user_id),
            vote_type,
            created_at: model.created_at,
        })
    }
}
