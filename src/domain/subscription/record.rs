//! Subscription ledger record.

use serde::Serialize;

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId, ValidationError};

/// Stripe customer and subscription identifiers attached to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeLink {
    pub customer_id: String,
    pub subscription_id: String,
}

impl StripeLink {
    pub fn new(
        customer_id: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let customer_id = customer_id.into();
        let subscription_id = subscription_id.into();
        if customer_id.trim().is_empty() {
            return Err(ValidationError::empty_field("stripe_customer_id"));
        }
        if subscription_id.trim().is_empty() {
            return Err(ValidationError::empty_field("stripe_subscription_id"));
        }
        Ok(Self {
            customer_id,
            subscription_id,
        })
    }
}

/// One row of the subscription ledger.
///
/// A user has at most one record, and its presence alone marks the user as
/// subscribed. `created_at` is fixed on first insert and survives upserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub created_at: Timestamp,
}

impl Subscription {
    /// Creates a fresh record for a user's first completed checkout.
    pub fn new(user_id: UserId, link: StripeLink) -> Self {
        Self {
            id: SubscriptionId::new(),
            user_id,
            stripe_customer_id: link.customer_id,
            stripe_subscription_id: link.subscription_id,
            created_at: Timestamp::now(),
        }
    }

    /// Replaces the Stripe identifiers, keeping identity and creation time.
    pub fn relink(&mut self, link: StripeLink) {
        self.stripe_customer_id = link.customer_id;
        self.stripe_subscription_id = link.subscription_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn stripe_link_rejects_blank_ids() {
        assert!(StripeLink::new("", "sub_1").is_err());
        assert!(StripeLink::new("cus_1", " ").is_err());
        assert!(StripeLink::new("cus_1", "sub_1").is_ok());
    }

    #[test]
    fn relink_keeps_id_and_created_at() {
        let mut record = Subscription::new(user(), StripeLink::new("cus_1", "sub_1").unwrap());
        let id = record.id;
        let created_at = record.created_at;

        record.relink(StripeLink::new("cus_2", "sub_2").unwrap());

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.stripe_customer_id, "cus_2");
        assert_eq!(record.stripe_subscription_id, "sub_2");
    }
}
