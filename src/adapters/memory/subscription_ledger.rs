//! In-memory subscription ledger.
//!
//! Enforces the same uniqueness rules as the `subscriptions` table. Used by
//! tests and by local runs without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{StripeLink, Subscription};
use crate::ports::SubscriptionLedger;

#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionLedger {
    records: Arc<RwLock<HashMap<UserId, Subscription>>>,
    failing: Arc<AtomicBool>,
}

impl InMemorySubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::database("ledger unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionLedger for InMemorySubscriptionLedger {
    async fn upsert_for_user(
        &self,
        user_id: &UserId,
        link: &StripeLink,
    ) -> Result<Subscription, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;

        for (owner, record) in records.iter() {
            if owner == user_id {
                continue;
            }
            if record.stripe_customer_id == link.customer_id {
                return Err(DomainError::conflict(
                    "subscriptions_stripe_customer_id_key",
                    "Stripe customer already linked to another user",
                ));
            }
            if record.stripe_subscription_id == link.subscription_id {
                return Err(DomainError::conflict(
                    "subscriptions_stripe_subscription_id_key",
                    "Stripe subscription already linked to another user",
                ));
            }
        }

        let record = records
            .entry(user_id.clone())
            .and_modify(|existing| existing.relink(link.clone()))
            .or_insert_with(|| Subscription::new(user_id.clone(), link.clone()));
        Ok(record.clone())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn exists_for_user(&self, user_id: &UserId) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.records.read().await.contains_key(user_id))
    }

    async fn delete_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.stripe_subscription_id != stripe_subscription_id);
        Ok(records.len() < before)
    }
}
