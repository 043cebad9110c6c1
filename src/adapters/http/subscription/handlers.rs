//! HTTP handlers for subscription endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::{
    CheckoutError, CreateCheckoutCommand, GetSubscriptionQuery, ReconcileWebhookCommand,
};

use super::dto::{
    CheckoutErrorResponse, CheckoutRequest, CheckoutResponse, SubscriptionResponse, WebhookAck,
};

const STRIPE_SIGNATURE: &str = "Stripe-Signature";

/// POST /api/subscriptions/stripe/webhook/
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(STRIPE_SIGNATURE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.reconcile_webhook_handler().handle(cmd).await {
        Ok(_) => (StatusCode::OK, Json(WebhookAck { received: true })).into_response(),
        Err(e) => (
            e.status_code(),
            Json(ErrorResponse::new(e.code(), e.to_string())),
        )
            .into_response(),
    }
}

/// POST /api/subscriptions/checkout/
///
/// A missing or unparsable body is treated like a missing `price_id`.
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Bytes,
) -> Response {
    let request: CheckoutRequest = serde_json::from_slice(&body).unwrap_or_default();

    let cmd = CreateCheckoutCommand {
        user,
        price_id: request.price_id,
    };

    match state.create_checkout_handler().handle(cmd).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(CheckoutResponse { url: session.url }),
        )
            .into_response(),
        Err(CheckoutError::Directory(e)) => domain_error_response(e),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(CheckoutErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /api/subscriptions/subscription/
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetSubscriptionQuery { user_id: user.id };

    match state.get_subscription_handler().handle(query).await {
        Ok(Some(record)) => Json(SubscriptionResponse::from(record)).into_response(),
        // Removed between the gate check and this read.
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Subscription")),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
