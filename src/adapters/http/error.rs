//! JSON error bodies shared by all HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard `{code, message}` error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(resource_type: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found", resource_type))
    }

    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "An unexpected error occurred")
    }
}

/// Maps a repository error to a response without leaking storage details.
pub fn domain_error_response(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::ExternalServiceError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => {
            tracing::error!(error = %error, "Request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal()))
                .into_response();
        }
    };

    (
        status,
        Json(ErrorResponse::new(error.code.to_string(), error.message())),
    )
        .into_response()
}
