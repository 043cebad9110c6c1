//! UpdateProfileHandler - Command handler for full and partial profile edits.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, UserId, ValidationError};
use crate::domain::user::{ProfileChanges, UserProfile};
use crate::ports::ProfileRepository;

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub changes: ProfileChanges,
}

#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

pub struct UpdateProfileHandler {
    repository: Arc<dyn ProfileRepository>,
}

impl UpdateProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<UserProfile, ProfileError> {
        let mut profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(cmd.user_id.clone()));

        profile.apply(cmd.changes)?;
        self.repository.save(&profile).await?;

        tracing::debug!(user_id = %cmd.user_id, "Profile updated");
        Ok(profile)
    }
}
