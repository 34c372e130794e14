//! In-memory backend for unit tests

use std::sync::Arc;

use arranke_cache::AggregateHub;
use arranke_common::{JwtService, TokenAuthProvider};
use arranke_core::{Identity, Profile, UserId};
use arranke_db::{MemoryObjectStore, MemoryStore};

use crate::services::ServiceContext;

pub(crate) struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub hub: Arc<AggregateHub>,
    pub auth: Arc<TokenAuthProvider>,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestBackend {
    /// Store changes are pushed to the hub
    pub fn new() -> Self {
        let hub = Arc::new(AggregateHub::new());
        Self::build(MemoryStore::new().with_sink(hub.clone()), hub)
    }

    /// Store changes are never pushed
    pub fn without_push() -> Self {
        Self::build(MemoryStore::new(), Arc::new(AggregateHub::new()))
    }

    fn build(store: MemoryStore, hub: Arc<AggregateHub>) -> Self {
        Self {
            store: Arc::new(store),
            hub,
            auth: Arc::new(TokenAuthProvider::new(JwtService::new(
                "unit-test-secret-0123456789abcdef",
                900,
            ))),
            objects: Arc::new(MemoryObjectStore::default()),
        }
    }

    pub fn context(&self) -> ServiceContext {
        ServiceContext::builder()
            .listing_repo(self.store.clone())
            .stats_repo(self.store.clone())
            .vote_repo(self.store.clone())
            .profile_repo(self.store.clone())
            .auth(self.auth.clone())
            .feed(self.hub.clone())
            .objects(self.objects.clone())
            .build()
            .unwrap()
    }

    pub fn identity(username: &str) -> Identity {
        Identity::new(UserId::generate())
            .with_username(username)
            .with_email(format!("{username}@example.com"))
    }

    /// Sign a fresh user in through the token provider
    pub fn sign_in(&self, username: &str) -> Identity {
        let identity = Self::identity(username);
        self.sign_in_as(&identity);
        identity
    }

    pub fn sign_in_as(&self, identity: &Identity) {
        let token = self.auth.jwt().issue(identity).unwrap();
        self.auth.sign_in(&token).unwrap();
    }

    pub fn seed_admin(&self, identity: &Identity) {
        let mut profile = Profile::new(identity.user_id);
        profile.username = identity.username.clone();
        profile.is_admin = true;
        self.store.seed_profile(profile);
    }
}
