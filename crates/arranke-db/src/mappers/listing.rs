//! Listing entity <-> model mapper

use arranke_core::entities::{DisplayNamePreference, Listing, ModerationStatus};
use arranke_core::error::DomainError;
use arranke_core::value_objects::{ListingId, UserId};

use crate::models::ListingModel;

impl TryFrom<ListingModel> for Listing {
    type Error = DomainError;

    fn try_from(model: ListingModel) -> Result<Self, Self::Error> {
        let status: ModerationStatus = model
            .status
            .parse()
            .map_err(|e| DomainError::DatabaseError(format!("listing {}: {e}", model.id)))?;

        Ok(Listing {
            id: ListingId::new(model.id),
            name: model.name,
            slogan: model.slogan,
            description: model.description,
            url: model.url,
            category: model.category,
            logo_url: model.logo_url,
            owner_id: UserId::new(model.owner_id),
            owner_name: model.owner_name,
            display_name_preference: DisplayNamePreference::parse_lenient(
                &model.display_name_preference,
            ),
            status,
            submission_date: model.submission_date,
            approval_date: model.approval_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
