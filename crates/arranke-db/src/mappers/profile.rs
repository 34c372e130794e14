//! Profile entity <-> model mapper

use arranke_core::entities::Profile;
use arranke_core::value_objects::UserId;

use crate::models::ProfileModel;

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            id: UserId::new(model.id),
            username: model.username,
            full_name: model.full_name,
            website: model.website,
            avatar_url: model.avatar_url,
            is_admin: model.is_admin,
            updated_at: model.updated_at,
        }
    }
}
