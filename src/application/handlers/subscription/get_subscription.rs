//! GetSubscriptionHandler - Query handler for the caller's ledger record.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionLedger;

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

/// Returns the user's record, or `None` if they have none.
pub struct GetSubscriptionHandler {
    ledger: Arc<dyn SubscriptionLedger>,
}

impl GetSubscriptionHandler {
    pub fn new(ledger: Arc<dyn SubscriptionLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetSubscriptionQuery) -> Result<Option<Subscription>, DomainError> {
        self.ledger.find_by_user(&query.user_id).await
    }
}
