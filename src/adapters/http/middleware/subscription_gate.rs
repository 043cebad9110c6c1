//! "Is subscribed" gate for routes reserved to paying users.
//!
//! Runs after [`auth_middleware`](super::auth_middleware) and asks the ledger
//! whether the caller has a record. The check is a plain existence query;
//! the absence of a record is not an error.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::domain_error_response;
use crate::application::handlers::subscription::CheckSubscribedHandler;
use crate::domain::foundation::AuthenticatedUser;
use crate::ports::SubscriptionLedger;

use super::auth::AuthRejection;

pub type GateState = Arc<dyn SubscriptionLedger>;

/// Rejects callers without a subscription record with 403.
///
/// Unauthenticated requests get 401 so the two cases stay distinguishable.
pub async fn require_subscription(
    State(ledger): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|u| u.id.clone())
    else {
        return AuthRejection::Unauthenticated.into_response();
    };

    match CheckSubscribedHandler::new(ledger).handle(&user_id).await {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            tracing::debug!(user_id = %user_id, "Caller has no subscription");
            AuthRejection::NotSubscribed.into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::middleware::{auth_middleware, AuthState};
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::InMemorySubscriptionLedger;
    use crate::domain::foundation::UserId;
    use crate::domain::subscription::StripeLink;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app(ledger: &InMemorySubscriptionLedger) -> Router {
        let validator: AuthState = Arc::new(
            MockSessionValidator::new()
                .with_test_user("paid", "user-paid")
                .with_test_user("free", "user-free"),
        );
        let gate: GateState = Arc::new(ledger.clone());
        Router::new()
            .route("/gated", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(gate, require_subscription))
            .layer(middleware::from_fn_with_state(validator, auth_middleware))
    }

    fn get_with(token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/gated");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn subscribed_ledger() -> InMemorySubscriptionLedger {
        let ledger = InMemorySubscriptionLedger::new();
        ledger
            .upsert_for_user(
                &UserId::new("user-paid").unwrap(),
                &StripeLink::new("cus_1", "sub_1").unwrap(),
            )
            .await
            .unwrap();
        ledger
    }

    #[tokio::test]
    async fn subscribed_caller_passes() {
        let ledger = subscribed_ledger().await;
        let response = app(&ledger).oneshot(get_with(Some("paid"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn caller_without_record_is_forbidden() {
        let ledger = subscribed_ledger().await;
        let response = app(&ledger).oneshot(get_with(Some("free"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn anonymous_caller_is_unauthorized() {
        let ledger = subscribed_ledger().await;
        let response = app(&ledger).oneshot(get_with(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ledger_failure_is_500() {
        let ledger = subscribed_ledger().await;
        ledger.set_failing(true);
        let response = app(&ledger).oneshot(get_with(Some("paid"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
