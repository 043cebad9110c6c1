//! Profile repository port.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserProfile;
use async_trait::async_trait;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the stored profile, or `None` if the user never saved one.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Inserts or replaces the user's profile.
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProfileRepository) {}
    }
}
