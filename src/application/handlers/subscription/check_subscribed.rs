//! CheckSubscribedHandler - the "is subscribed" permission query.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionLedger;

/// Answers whether a user currently holds a ledger record.
pub struct CheckSubscribedHandler {
    ledger: Arc<dyn SubscriptionLedger>,
}

impl CheckSubscribedHandler {
    pub fn new(ledger: Arc<dyn SubscriptionLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, user_id: &UserId) -> Result<bool, DomainError> {
        self.ledger.exists_for_user(user_id).await
    }
}
