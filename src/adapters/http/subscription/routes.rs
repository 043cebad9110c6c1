//! Axum routes for subscription endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::require_subscription;
use crate::adapters::http::state::AppState;

use super::handlers::{create_checkout, get_subscription, stripe_webhook};

/// Routes mounted under `/api/subscriptions`.
///
/// - `POST /stripe/webhook/` - Stripe deliveries, verified by signature
/// - `POST /checkout/` - any authenticated caller
/// - `GET /subscription/` - subscribed callers only
pub fn subscription_routes(state: &AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/subscription/", get(get_subscription))
        .route_layer(middleware::from_fn_with_state(
            state.ledger.clone(),
            require_subscription,
        ));

    Router::new()
        .route("/stripe/webhook/", post(stripe_webhook))
        .route("/checkout/", post(create_checkout))
        .merge(gated)
}
