//! Request and response types for the application services
//!
//! Requests derive `Validate`; services validate before touching any store.

pub mod requests;
pub mod responses;

pub use requests::{NewListingRequest, UpdateListingRequest, UpdateProfileRequest};
pub use responses::{ListingView, ProfileView};
