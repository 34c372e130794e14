//! Auth provider capability

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::Identity;
use crate::events::Subscription;

/// Callback invoked with the new identity (or `None` after sign-out)
pub type SessionListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The currently signed-in identity, if any
    async fn current_session(&self) -> RepoResult<Option<Identity>>;

    /// Register for sign-in/sign-out notifications
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}
