//! GetProfileHandler - Query handler for the caller's profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct GetProfileQuery {
    pub user_id: UserId,
}

/// Returns the stored profile, or an empty one if none was ever saved.
pub struct GetProfileHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl GetProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<UserProfile, DomainError> {
        Ok(self
            .repository
            .find_by_user(&query.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(query.user_id)))
    }
}
