//! Listing entity - a user-submitted project ("arranke")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::profile::DisplayNamePreference;
use crate::value_objects::{ListingId, UserId};

/// Moderation status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// An admin has already ruled on the listing
    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = ModerationStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ModerationStatusParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown moderation status: {0}")]
pub struct ModerationStatusParseError(pub String);

/// Listing entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub slogan: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub logo_url: Option<String>,
    pub owner_id: UserId,
    pub owner_name: Option<String>,
    pub display_name_preference: DisplayNamePreference,
    pub status: ModerationStatus,
    pub submission_date: DateTime<Utc>,
    pub approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new pending listing owned by `owner_id`
    pub fn new(id: ListingId, owner_id: UserId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            slogan: None,
            description: None,
            url: None,
            category: None,
            logo_url: None,
            owner_id,
            owner_name: None,
            display_name_preference: DisplayNamePreference::Default,
            status: ModerationStatus::Pending,
            submission_date: now,
            approval_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Visible in public showcases and search
    #[inline]
    pub fn is_public(&self) -> bool {
        self.status == ModerationStatus::Approved
    }

    /// Record an admin decision
    pub fn decide(&mut self, status: ModerationStatus, at: DateTime<Utc>) {
        self.status = status;
        self.approval_date = Some(at);
        self.updated_at = at;
    }

    /// Case-insensitive match on name, category or description
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        std::iter::once(Some(self.name.as_str()))
            .chain([self.category.as_deref(), self.description.as_deref()])
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        let mut listing = Listing::new(ListingId::new("1"), UserId::generate(), "Rusty Board");
        listing.category = Some("Developer Tools".to_string());
        listing.description = Some("A kanban board".to_string());
        listing
    }

    #[test]
    fn test_new_listing_is_pending() {
        let listing = listing();
        assert_eq!(listing.status, ModerationStatus::Pending);
        assert!(!listing.is_public());
        assert!(listing.approval_date.is_none());
    }

    #[test]
    fn test_decide_sets_approval_date() {
        let mut listing = listing();
        let at = Utc::now();
        listing.decide(ModerationStatus::Approved, at);
        assert!(listing.is_public());
        assert_eq!(listing.approval_date, Some(at));
        assert!(listing.status.is_decided());
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let listing = listing();
        assert!(listing.matches("rusty"));
        assert!(listing.matches("DEVELOPER"));
        assert!(listing.matches("kanban"));
        assert!(!listing.matches("spreadsheet"));
        assert!(listing.matches("  "));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "rejected".parse::<ModerationStatus>().unwrap(),
            ModerationStatus::Rejected
        );
        assert!("archived".parse::<ModerationStatus>().is_err());
    }
}
