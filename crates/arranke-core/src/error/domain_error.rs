//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{ListingId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Listing not found: {0}")]
    ListingNotFound(ListingId),

    #[error("Profile not found: {0}")]
    ProfileNotFound(UserId),

    #[error("Vote not found")]
    VoteNotFound,

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("File too large: max {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Not listing owner")]
    NotListingOwner,

    #[error("Admin role required")]
    AdminRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Listing name already taken: {0}")]
    ListingNameTaken(String),

    #[error("Vote already exists")]
    VoteAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Auth provider error: {0}")]
    AuthError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ListingNotFound(_) => "UNKNOWN_LISTING",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::VoteNotFound => "UNKNOWN_VOTE",
            Self::ObjectNotFound(_) => "UNKNOWN_OBJECT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",

            // Authorization
            Self::NotSignedIn => "NOT_SIGNED_IN",
            Self::NotListingOwner => "NOT_LISTING_OWNER",
            Self::AdminRequired => "ADMIN_REQUIRED",

            // Conflict
            Self::ListingNameTaken(_) => "LISTING_NAME_TAKEN",
            Self::VoteAlreadyExists => "VOTE_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::AuthError(_) => "AUTH_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ListingNotFound(_)
                | Self::ProfileNotFound(_)
                | Self::VoteNotFound
                | Self::ObjectNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::UnsupportedContentType(_) | Self::FileTooLarge { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotSignedIn | Self::NotListingOwner | Self::AdminRequired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ListingNameTaken(_) | Self::VoteAlreadyExists)
    }
}
