//! Authentication middleware and extractor for axum.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth reads from extensions
//! ```
//!
//! The middleware only knows the `SessionValidator` port, so the OIDC
//! validator and the test mock plug in the same way.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates `Authorization: Bearer <token>` and injects the caller.
///
/// A request without a bearer token passes through untouched; routes that
/// need a caller enforce it with [`RequireAuth`]. A token that is present but
/// invalid is rejected here with 401, or 503 when the identity provider
/// cannot be reached.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => AuthRejection::from(e).into_response(),
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No bearer token was provided.
    Unauthenticated,
    /// A token was provided but did not validate.
    InvalidToken,
    /// The token has expired.
    TokenExpired,
    /// Authenticated, but the caller has no subscription record.
    NotSubscribed,
    /// The identity provider could not be reached.
    Unavailable,
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => AuthRejection::InvalidToken,
            AuthError::TokenExpired => AuthRejection::TokenExpired,
            AuthError::NotSubscribed => AuthRejection::NotSubscribed,
            AuthError::ServiceUnavailable(msg) => {
                tracing::error!(error = %msg, "Auth service unavailable");
                AuthRejection::Unavailable
            }
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required",
            ),
            AuthRejection::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR", "Invalid token")
            }
            AuthRejection::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR", "Token expired")
            }
            AuthRejection::NotSubscribed => (
                StatusCode::FORBIDDEN,
                "NOT_SUBSCRIBED",
                "An active subscription is required",
            ),
            AuthRejection::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_UNAVAILABLE",
                "Authentication service unavailable",
            ),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
