//! HTTP handlers for profile endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::{GetProfileQuery, ProfileError, UpdateProfileCommand};
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::user::ProfileChanges;

use super::dto::{PatchProfileRequest, ProfileResponse, ReplaceProfileRequest};

/// GET /api/accounts/profile/
pub async fn get_profile(State(state): State<AppState>, RequireAuth(user): RequireAuth) -> Response {
    let query = GetProfileQuery {
        user_id: user.id.clone(),
    };

    match state.get_profile_handler().handle(query).await {
        Ok(profile) => Json(ProfileResponse::new(&profile, user.email)).into_response(),
        Err(e) => domain_error_response(e),
    }
}

/// PUT /api/accounts/profile/
pub async fn replace_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<ReplaceProfileRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(req)) => update(&state, user, req.into()).await,
        Err(rejection) => bad_body(rejection),
    }
}

/// PATCH /api/accounts/profile/
pub async fn patch_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<PatchProfileRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(req)) => update(&state, user, req.into()).await,
        Err(rejection) => bad_body(rejection),
    }
}

async fn update(state: &AppState, user: AuthenticatedUser, changes: ProfileChanges) -> Response {
    let cmd = UpdateProfileCommand {
        user_id: user.id.clone(),
        changes,
    };

    match state.update_profile_handler().handle(cmd).await {
        Ok(profile) => Json(ProfileResponse::new(&profile, user.email)).into_response(),
        Err(ProfileError::Validation(e)) => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("VALIDATION_FAILED", e.to_string())
                    .with_details(serde_json::json!({ "field": e.field() })),
            ),
        )
            .into_response(),
        Err(ProfileError::Storage(e)) => domain_error_response(e),
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("BAD_REQUEST", rejection.body_text())),
    )
        .into_response()
}
