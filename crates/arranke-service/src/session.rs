//! Session context
//!
//! One object per signed-in surface holding the current identity. It reads the
//! provider once on connect and then follows its change notifications until
//! closed; components needing identity are handed the context explicitly.

use std::sync::Arc;

use arranke_core::traits::{AuthProvider, RepoResult};
use arranke_core::{Identity, Subscription, UserId};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, instrument};

pub struct SessionContext {
    identity: Arc<watch::Sender<Option<Identity>>>,
    subscription: Mutex<Option<Subscription>>,
}

impl SessionContext {
    /// Read the current session and follow changes from `provider`
    ///
    /// # Errors
    /// Returns the provider's error if the initial session read fails
    #[instrument(skip(provider))]
    pub async fn connect(provider: Arc<dyn AuthProvider>) -> RepoResult<Self> {
        let (tx, _rx) = watch::channel(None);
        let identity = Arc::new(tx);
        let changed = Arc::new(Mutex::new(false));

        // Listen before reading so a change racing the read is not lost.
        let subscription = {
            let identity = identity.clone();
            let changed = changed.clone();
            provider.on_session_change(Box::new(move |next: Option<Identity>| {
                let mut changed = changed.lock();
                *changed = true;
                debug!(signed_in = next.is_some(), "Session changed");
                identity.send_replace(next);
            }))
        };

        let current = provider.current_session().await?;
        // Checked and written under the same lock the listener takes.
        let changed = changed.lock();
        if !*changed {
            identity.send_replace(current);
        }
        drop(changed);

        Ok(Self {
            identity,
            subscription: Mutex::new(Some(subscription)),
        })
    }

    /// A context with a fixed identity and no provider behind it
    pub fn fixed(identity: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(identity);
        Self {
            identity: Arc::new(tx),
            subscription: Mutex::new(None),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.borrow().as_ref().map(|i| i.user_id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.borrow().is_some()
    }

    /// Receiver that observes every identity change
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    /// Stop following the provider; the last identity is kept
    pub fn close(&self) {
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .map_or(true, |s| !s.is_active())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user_id", &self.user_id())
            .field("closed", &self.is_closed())
            .finish()
    }
}
