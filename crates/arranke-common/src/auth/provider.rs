//! Auth provider backed by backend-issued access tokens

use arranke_core::{AuthProvider, Identity, ListenerSet, RepoResult, SessionListener, Subscription};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{info, instrument};

use super::JwtService;
use crate::error::AppResult;

/// Holds the current session and notifies listeners on sign-in/sign-out
#[derive(Debug)]
pub struct TokenAuthProvider {
    jwt: JwtService,
    current: RwLock<Option<Identity>>,
    listeners: ListenerSet<Option<Identity>>,
}

impl TokenAuthProvider {
    pub fn new(jwt: JwtService) -> Self {
        Self {
            jwt,
            current: RwLock::new(None),
            listeners: ListenerSet::new(),
        }
    }

    /// Validate an access token and make it the current session
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired; the current
    /// session is left unchanged
    #[instrument(skip(self, token))]
    pub fn sign_in(&self, token: &str) -> AppResult<Identity> {
        let identity = self.jwt.identify(token)?;
        *self.current.write() = Some(identity.clone());

        info!(user_id = %identity.user_id, "Signed in");
        self.listeners.emit(&Some(identity.clone()));
        Ok(identity)
    }

    /// Clear the current session
    #[instrument(skip(self))]
    pub fn sign_out(&self) {
        let previous = self.current.write().take();
        if let Some(identity) = previous {
            info!(user_id = %identity.user_id, "Signed out");
            self.listeners.emit(&None);
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn current_session(&self) -> RepoResult<Option<Identity>> {
        Ok(self.current.read().clone())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        self.listeners
            .add(move |identity: &Option<Identity>| listener(identity.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arranke_core::UserId;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn provider() -> TokenAuthProvider {
        TokenAuthProvider::new(JwtService::new("provider-test-secret-0123456789", 900))
    }

    #[tokio::test]
    async fn test_sign_in_sets_session() {
        let provider = provider();
        assert!(provider.current_session().await.unwrap().is_none());

        let identity = Identity::new(UserId::generate()).with_username("ana");
        let token = provider.jwt().issue(&identity).unwrap();
        provider.sign_in(&token).unwrap();

        assert_eq!(provider.current_session().await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_invalid_token_keeps_session() {
        let provider = provider();
        assert!(provider.sign_in("garbage").is_err());
        assert!(provider.current_session().await.unwrap().is_none());
    }

    #[test]
    fn test_listeners_notified() {
        let provider = provider();
        let seen: Arc<Mutex<Vec<Option<UserId>>>> = Arc::default();
        let seen_clone = seen.clone();
        let sub = provider.on_session_change(Box::new(move |identity| {
            seen_clone.lock().push(identity.map(|i| i.user_id));
        }));

        let user_id = UserId::generate();
        let token = provider.jwt().issue(&Identity::new(user_id)).unwrap();
        provider.sign_in(&token).unwrap();
        provider.sign_out();
        // second sign-out is a no-op
        provider.sign_out();

        assert_eq!(*seen.lock(), vec![Some(user_id), None]);

        sub.unsubscribe();
        provider.sign_in(&token).unwrap();
        assert_eq!(seen.lock().len(), 2);
    }
}
