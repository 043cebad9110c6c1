//! User directory port.
//!
//! Local mirror of identity-provider users, keyed by subject and searchable
//! by email. The webhook needs it to turn a purchaser email into a user.

use crate::domain::foundation::{AuthenticatedUser, DomainError, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the user owning `email`. Matching is case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>, DomainError>;

    /// Inserts the caller or refreshes their stored email.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a different user already owns the email
    /// - `DatabaseError` on persistence failure
    async fn provision(&self, user: &AuthenticatedUser) -> Result<(), DomainError>;
}
