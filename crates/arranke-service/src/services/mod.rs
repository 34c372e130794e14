//! Application services
//!
//! Listing submission and browsing, moderation, profiles, and image uploads,
//! all orchestrated over the capabilities held by [`ServiceContext`].

pub mod context;
pub mod error;
pub mod listing;
pub mod moderation;
pub mod profile;
pub mod upload;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use listing::{ListingService, DEFAULT_PAGE_SIZE};
pub use moderation::ModerationService;
pub use profile::ProfileService;
pub use upload::Upload;
