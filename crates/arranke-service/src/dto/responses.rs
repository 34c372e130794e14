//! Response DTOs
//!
//! All response DTOs implement `Serialize` for callers that render JSON.

use arranke_core::{resolve_display_name, DisplayNamePreference, Listing, ListingStats, Profile};
use serde::Serialize;

/// A listing together with its counters and resolved owner name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub stats: ListingStats,
    pub owner_display_name: String,
}

impl ListingView {
    /// `stats` absent means the row does not exist yet; counters read as zero
    pub fn new(listing: Listing, stats: Option<ListingStats>, owner: Option<&Profile>) -> Self {
        let stats = stats.unwrap_or_else(|| ListingStats::zeroed(listing.id.clone()));
        let owner_display_name = resolve_display_name(
            owner.and_then(|p| p.full_name.as_deref()),
            owner
                .and_then(|p| p.username.as_deref())
                .or(listing.owner_name.as_deref()),
            listing.display_name_preference,
        );

        Self {
            listing,
            stats,
            owner_display_name,
        }
    }
}

/// A profile with the name other users see
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub display_name: String,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        let display_name = profile.display_name(DisplayNamePreference::Default);
        Self {
            profile,
            display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arranke_core::{ListingId, UserId, FALLBACK_DISPLAY_NAME};

    #[test]
    fn test_listing_view_defaults() {
        let listing = Listing::new(ListingId::new("p"), UserId::generate(), "Arranke");
        let view = ListingView::new(listing, None, None);

        assert_eq!(view.stats, ListingStats::zeroed(ListingId::new("p")));
        assert_eq!(view.owner_display_name, FALLBACK_DISPLAY_NAME);
    }

    #[test]
    fn test_listing_view_honours_preference() {
        let owner = UserId::generate();
        let mut listing = Listing::new(ListingId::new("p"), owner, "Arranke");
        listing.owner_name = Some("ana".to_string());
        listing.display_name_preference = DisplayNamePreference::FullName;

        let mut profile = Profile::new(owner);
        profile.full_name = Some("Ana Pérez".to_string());

        let view = ListingView::new(listing.clone(), None, Some(&profile));
        assert_eq!(view.owner_display_name, "Ana Pérez");

        listing.display_name_preference = DisplayNamePreference::Username;
        let view = ListingView::new(listing, None, Some(&profile));
        assert_eq!(view.owner_display_name, "ana");
    }

    #[test]
    fn test_serializes_flat() {
        let listing = Listing::new(ListingId::new("p"), UserId::generate(), "Arranke");
        let json = serde_json::to_value(ListingView::new(listing, None, None)).unwrap();
        assert_eq!(json["name"], "Arranke");
        assert_eq!(json["stats"]["likes_count"], 0);
    }
}
