//! # arranke-service
//!
//! Application layer for the arranke showcase: the per-listing reaction
//! ledger, session tracking, and the listing, moderation, and profile
//! services.
//!
//! Everything here talks to the backend through the capability traits in
//! `arranke-core`, so the same code runs against PostgreSQL/Redis (see
//! [`bootstrap`]) or the in-memory store used by the tests.

pub mod bootstrap;
pub mod dto;
pub mod ledger;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::Backend;
pub use ledger::{LedgerStep, LoginPrompt, ReactionLedger, Rejection, VoteOutcome};
pub use services::{
    ListingService, ModerationService, ProfileService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, Upload,
};
pub use session::SessionContext;
