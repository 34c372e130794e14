//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use arranke_core::DisplayNamePreference;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Listing Requests
// ============================================================================

/// Submit a new listing
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewListingRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: String,

    #[validate(length(max = 150, message = "Slogan must be at most 150 characters"))]
    pub slogan: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid project URL"))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,

    pub display_name_preference: Option<DisplayNamePreference>,
}

/// Owner edit of an existing listing; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateListingRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank", message = "Name must not be blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 150, message = "Slogan must be at most 150 characters"))]
    pub slogan: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid project URL"))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,

    pub display_name_preference: Option<DisplayNamePreference>,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Update the caller's profile; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,

    /// Applied to every listing the caller owns
    pub display_name_preference: Option<DisplayNamePreference>,
}
