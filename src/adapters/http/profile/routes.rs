//! Axum routes for profile endpoints.

use axum::{middleware, routing::get, Router};

use crate::adapters::http::middleware::require_subscription;
use crate::adapters::http::state::AppState;

use super::handlers::{get_profile, patch_profile, replace_profile};

/// Routes mounted under `/api/accounts`. Subscribed callers only.
pub fn profile_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/profile/",
            get(get_profile).put(replace_profile).patch(patch_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state.ledger.clone(),
            require_subscription,
        ))
}
