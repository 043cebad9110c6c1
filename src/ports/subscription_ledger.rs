//! Subscription ledger port.
//!
//! One record per user. Writes come only from verified webhook events; reads
//! serve the "is subscribed" gate and the subscription view.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{StripeLink, Subscription};
use async_trait::async_trait;

/// Repository port for the subscription ledger.
///
/// Implementations must enforce uniqueness of `user_id`,
/// `stripe_customer_id` and `stripe_subscription_id`.
#[async_trait]
pub trait SubscriptionLedger: Send + Sync {
    /// Creates the user's record or overwrites its Stripe identifiers.
    ///
    /// Must be atomic with respect to concurrent upserts for the same user and
    /// must keep the existing `id` and `created_at` on overwrite.
    ///
    /// # Errors
    ///
    /// - `Conflict` if another user's record already holds one of the ids
    /// - `DatabaseError` on persistence failure
    async fn upsert_for_user(
        &self,
        user_id: &UserId,
        link: &StripeLink,
    ) -> Result<Subscription, DomainError>;

    /// Returns the user's record, if any.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError>;

    /// Returns true if the user has a record.
    async fn exists_for_user(&self, user_id: &UserId) -> Result<bool, DomainError>;

    /// Deletes the record holding this Stripe subscription id.
    ///
    /// Returns whether a record was removed. A missing record is not an error.
    async fn delete_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn SubscriptionLedger) {}
    }
}
