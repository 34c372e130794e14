//! Profile service
//!
//! Profile reads and edits, and avatar replacement.

use arranke_core::{Identity, Profile, UserId, AVATARS_BUCKET};
use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{ProfileView, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::upload::{object_path_from_url, store_image, validate_image, Upload};

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public profile of any user
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: UserId) -> ServiceResult<ProfileView> {
        self.ctx
            .profile_repo()
            .find(user_id)
            .await?
            .map(ProfileView::from)
            .ok_or_else(|| ServiceError::not_found("Profile", user_id.to_string()))
    }

    /// The caller's profile; a fresh one if none is stored yet
    #[instrument(skip(self), fields(user_id = %identity.user_id))]
    pub async fn current(&self, identity: &Identity) -> ServiceResult<Profile> {
        Ok(self
            .ctx
            .profile_repo()
            .find(identity.user_id)
            .await?
            .unwrap_or_else(|| {
                let mut profile = Profile::new(identity.user_id);
                profile.username = identity.username.clone();
                profile
            }))
    }

    /// Edit the caller's profile
    ///
    /// A display-name preference is applied to every listing the caller owns.
    #[instrument(skip(self, request), fields(user_id = %identity.user_id))]
    pub async fn update(
        &self,
        identity: &Identity,
        request: UpdateProfileRequest,
    ) -> ServiceResult<Profile> {
        request.validate()?;
        let mut profile = self.current(identity).await?;

        if let Some(username) = request.username {
            profile.username = Some(username);
        }
        if let Some(full_name) = request.full_name {
            profile.full_name = Some(full_name);
        }
        if let Some(website) = request.website {
            profile.website = Some(website);
        }
        profile.updated_at = Utc::now();
        self.ctx.profile_repo().upsert(&profile).await?;

        if let Some(preference) = request.display_name_preference {
            let listings = self
                .ctx
                .listing_repo()
                .find_by_owner(identity.user_id)
                .await?;
            for mut listing in listings {
                if listing.display_name_preference != preference {
                    listing.display_name_preference = preference;
                    self.ctx.listing_repo().update(&listing).await?;
                }
            }
        }

        info!("Profile updated");
        Ok(profile)
    }

    /// Replace the caller's avatar
    ///
    /// The previous object is removed on a best-effort basis before the new
    /// one is stored.
    #[instrument(skip(self, upload), fields(user_id = %identity.user_id))]
    pub async fn replace_avatar(&self, identity: &Identity, upload: Upload) -> ServiceResult<Profile> {
        validate_image(&upload, self.ctx.storage_config().max_file_size_bytes())?;
        let mut profile = self.current(identity).await?;

        if let Some(old) = profile
            .avatar_url
            .as_deref()
            .and_then(|url| object_path_from_url(AVATARS_BUCKET, url))
        {
            if let Err(e) = self.ctx.objects().remove(AVATARS_BUCKET, &[old]).await {
                warn!(error = %e, "Failed to remove previous avatar");
            }
        }

        let url = store_image(self.ctx, AVATARS_BUCKET, identity.user_id, &upload).await?;
        profile.avatar_url = Some(url);
        profile.updated_at = Utc::now();
        self.ctx.profile_repo().upsert(&profile).await?;

        info!("Avatar replaced");
        Ok(profile)
    }
}
