//! Pub/Sub channel definitions.
//!
//! Aggregate changes for a listing travel on `listing_stats:{listing_id}`.

use arranke_core::ListingId;

/// Channel prefix for per-listing stats changes
pub const LISTING_STATS_PREFIX: &str = "listing_stats:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Stats row changes for one listing
    ListingStats(ListingId),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn listing_stats(listing_id: ListingId) -> Self {
        Self::ListingStats(listing_id)
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Pattern matching every listing stats channel
    #[must_use]
    pub fn all_listing_stats_pattern() -> String {
        format!("{LISTING_STATS_PREFIX}*")
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::ListingStats(id) => format!("{LISTING_STATS_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.strip_prefix(LISTING_STATS_PREFIX) {
            Some(id) if !id.is_empty() => Self::ListingStats(ListingId::new(id)),
            _ => Self::Custom(name.to_string()),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
