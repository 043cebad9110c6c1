//! Shared setup for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use subscription_service::adapters::auth::MockSessionValidator;
use subscription_service::adapters::http::{api_router, AppState};
use subscription_service::adapters::memory::{
    InMemoryProfileRepository, InMemorySubscriptionLedger, InMemoryUserDirectory,
};
use subscription_service::adapters::stripe::MockPaymentProvider;
use subscription_service::domain::foundation::UserId;
use subscription_service::domain::subscription::{sign_payload, StripeLink, StripeWebhookVerifier};
use subscription_service::ports::SubscriptionLedger;

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const BASE_URL: &str = "https://app.example.com";

/// Token for a user who already holds a subscription record.
pub const PAID_TOKEN: &str = "paid-token";
pub const PAID_USER: &str = "user-paid";

/// Token for a user with no record.
pub const FREE_TOKEN: &str = "free-token";
pub const FREE_USER: &str = "user-free";

pub struct TestApp {
    pub router: Router,
    pub ledger: InMemorySubscriptionLedger,
    pub directory: InMemoryUserDirectory,
    pub profiles: InMemoryProfileRepository,
    pub payments: MockPaymentProvider,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(false).await
    }

    pub async fn requiring_livemode() -> Self {
        Self::build(true).await
    }

    async fn build(require_livemode: bool) -> Self {
        let ledger = InMemorySubscriptionLedger::new();
        let directory = InMemoryUserDirectory::new();
        let profiles = InMemoryProfileRepository::new();
        let payments = MockPaymentProvider::new();

        for id in [PAID_USER, FREE_USER] {
            directory
                .insert(user_id(id), &format!("{}@test.example.com", id))
                .await;
        }
        ledger
            .upsert_for_user(
                &user_id(PAID_USER),
                &StripeLink::new("cus_paid", "sub_paid").unwrap(),
            )
            .await
            .unwrap();

        let validator = MockSessionValidator::new()
            .with_test_user(PAID_TOKEN, PAID_USER)
            .with_test_user(FREE_TOKEN, FREE_USER);

        let state = AppState {
            ledger: Arc::new(ledger.clone()),
            directory: Arc::new(directory.clone()),
            profiles: Arc::new(profiles.clone()),
            payment_provider: Arc::new(payments.clone()),
            session_validator: Arc::new(validator),
            webhook_verifier: StripeWebhookVerifier::new(WEBHOOK_SECRET),
            base_url: BASE_URL.to_string(),
            require_livemode,
        };

        Self {
            router: api_router(state),
            ledger,
            directory,
            profiles,
            payments,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

pub fn user_id(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Builds a Stripe event body around `object`.
pub fn event_body(event_type: &str, object: Value, livemode: bool) -> String {
    serde_json::json!({
        "id": "evt_integration",
        "object": "event",
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "livemode": livemode,
        "api_version": "2024-06-20",
        "data": { "object": object }
    })
    .to_string()
}

/// Signs `body` with the test secret at the current time.
pub fn signature_for(body: &str) -> String {
    let t = chrono::Utc::now().timestamp();
    format!("t={},v1={}", t, sign_payload(WEBHOOK_SECRET, t, body.as_bytes()))
}

pub fn webhook_request(body: String, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/subscriptions/stripe/webhook/")
        .header("Content-Type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn signed_webhook(body: String) -> Request<Body> {
    let signature = signature_for(&body);
    webhook_request(body, Some(signature))
}
