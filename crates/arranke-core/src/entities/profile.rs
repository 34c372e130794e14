//! Profile entity and owner display-name resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Shown when a listing owner has neither a full name nor a username
pub const FALLBACK_DISPLAY_NAME: &str = "usuario";

/// Which owner name a listing card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayNamePreference {
    FullName,
    Username,
    #[default]
    Default,
}

impl DisplayNamePreference {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Username => "username",
            Self::Default => "default",
        }
    }

    /// Lenient parse: anything unknown is `Default`
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "full_name" => Self::FullName,
            "username" => Self::Username,
            _ => Self::Default,
        }
    }
}

/// Resolve the owner name to display for a listing
///
/// An explicit preference wins only when the chosen name exists; otherwise the
/// full name, then the username, then [`FALLBACK_DISPLAY_NAME`].
pub fn resolve_display_name(
    owner_name: Option<&str>,
    owner_username: Option<&str>,
    preference: DisplayNamePreference,
) -> String {
    fn non_empty(s: Option<&str>) -> Option<&str> {
        s.filter(|v| !v.trim().is_empty())
    }

    let full = non_empty(owner_name);
    let user = non_empty(owner_username);

    let chosen = match preference {
        DisplayNamePreference::FullName if full.is_some() => full,
        DisplayNamePreference::Username if user.is_some() => user,
        _ => full.or(user),
    };

    chosen.unwrap_or(FALLBACK_DISPLAY_NAME).to_string()
}

/// User profile (`profiles`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Empty, non-admin profile for a user
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            full_name: None,
            website: None,
            avatar_url: None,
            is_admin: false,
            updated_at: Utc::now(),
        }
    }

    /// Display name under the given preference
    pub fn display_name(&self, preference: DisplayNamePreference) -> String {
        resolve_display_name(
            self.full_name.as_deref(),
            self.username.as_deref(),
            preference,
        )
    }
}
