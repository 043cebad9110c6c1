//! HTTP DTOs for subscription endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::subscription::Subscription;

/// Body of `POST /checkout/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub price_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Checkout keeps a bare `{error}` body for existing clients.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// The caller's own ledger record. Stripe ids stay server-side.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub created_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(record: Subscription) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}
