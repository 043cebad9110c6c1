//! Webhook error types for Stripe webhook handling.
//!
//! Every variant maps to the HTTP status Stripe sees. 4xx responses stop
//! redelivery, 5xx responses make Stripe retry with backoff.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while verifying or reconciling a webhook delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// Request arrived without a `Stripe-Signature` header.
    #[error("Missing Stripe-Signature header")]
    MissingSignatureHeader,

    /// Signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignatureHeader(String),

    /// No `v1` signature matched the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed timestamp is older than the replay window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed timestamp is too far in the future.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Verified body is not a valid event envelope.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Completed checkout carries an email no local user owns.
    #[error("No user matches purchaser email")]
    UserNotMatched,

    /// Ledger or directory operation failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Storage(_))
    }

    /// Returns true for failures that happen before the payload is trusted.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignatureHeader
                | WebhookError::MalformedSignatureHeader(_)
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
        )
    }

    /// Maps the error to the status code returned to Stripe.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code for response bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MissingSignatureHeader => "MISSING_SIGNATURE",
            WebhookError::MalformedSignatureHeader(_) => "MALFORMED_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::TimestampOutOfRange | WebhookError::InvalidTimestamp => {
                "INVALID_TIMESTAMP"
            }
            WebhookError::InvalidPayload(_) => "INVALID_PAYLOAD",
            WebhookError::UserNotMatched => "USER_NOT_MATCHED",
            WebhookError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
