//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{normalize_email, AuthenticatedUser, DomainError, UserId};
use crate::ports::UserDirectory;

/// Users keyed by subject, with emails stored normalized.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, String>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user directly, bypassing provisioning.
    pub async fn insert(&self, user_id: UserId, email: &str) {
        self.users
            .write()
            .await
            .insert(user_id, normalize_email(email));
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>, DomainError> {
        let wanted = normalize_email(email);
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|(_, stored)| **stored == wanted)
            .map(|(id, _)| id.clone()))
    }

    async fn provision(&self, user: &AuthenticatedUser) -> Result<(), DomainError> {
        let email = user.normalized_email();
        let mut users = self.users.write().await;
        let taken = users
            .iter()
            .any(|(id, stored)| *id != user.id && *stored == email);
        if taken {
            return Err(DomainError::conflict(
                "users_email_key",
                "Email already belongs to another user",
            ));
        }
        users.insert(user.id.clone(), email);
        Ok(())
    }
}
