//! Router assembly.
//!
//! [`api_router`] is the bare application, used directly by tests.
//! [`with_http_layers`] wraps it with the tower-http stack for serving.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::middleware::auth_middleware;
use super::profile::profile_routes;
use super::state::AppState;
use super::subscription::subscription_routes;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Application routes with authentication, without transport layers.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/subscriptions", subscription_routes(&state))
        .nest("/accounts", profile_routes(&state))
        .layer(middleware::from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}

/// Adds request ids, tracing, CORS, timeout and compression.
pub fn with_http_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(&config.cors_origins_list()))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::{
        InMemoryProfileRepository, InMemorySubscriptionLedger, InMemoryUserDirectory,
    };
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::subscription::StripeWebhookVerifier;

    fn state() -> AppState {
        AppState {
            ledger: Arc::new(InMemorySubscriptionLedger::new()),
            directory: Arc::new(InMemoryUserDirectory::new()),
            profiles: Arc::new(InMemoryProfileRepository::new()),
            payment_provider: Arc::new(MockPaymentProvider::new()),
            session_validator: Arc::new(MockSessionValidator::new()),
            webhook_verifier: StripeWebhookVerifier::new("whsec_test"),
            base_url: "http://localhost:5173".to_string(),
            require_livemode: false,
        }
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let response = api_router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = with_http_layers(api_router(state()), &ServerConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key(REQUEST_ID));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = api_router(state())
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
