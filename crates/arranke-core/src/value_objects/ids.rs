//! Identifiers for listings and users
//!
//! Listing ids are opaque to this crate: the backend decides their shape
//! (serial integers, uuids, slugs) and the client only ever echoes them back.
//! User ids are the auth provider's uuid subject.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque listing identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Wrap a backend-issued listing id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random id (used when this side creates the row)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ListingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Authenticated user identifier (auth provider subject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    #[inline]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random user id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Parse from the string form used in token subjects
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdParseError::InvalidUserId(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for UserId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid user id: {0}")]
    InvalidUserId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_id_is_opaque() {
        let id = ListingId::new("proj-1");
        assert_eq!(id.as_str(), "proj-1");
        assert_eq!(id.to_string(), "proj-1");
        assert_eq!(ListingId::from("proj-1"), id);
    }

    #[test]
    fn test_listing_id_serializes_as_plain_string() {
        let id = ListingId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
    }

    #[test]
    fn test_user_id_parse() {
        let raw = "6f1c1e3a-9a56-4d7e-8a8b-1b0f6d2c4e11";
        let id: UserId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!(UserId::parse("not-a-uuid").is_err());
    }
}
