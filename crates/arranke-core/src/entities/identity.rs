//! Identity entity - the signed-in user as reported by the auth provider

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Signed-in user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
    /// Username from the provider's user metadata
    pub username: Option<String>,
}

impl Identity {
    /// Create an identity with only a user id
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            username: None,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
