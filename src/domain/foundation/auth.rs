//! Authenticated caller identity.
//!
//! Populated by whichever `SessionValidator` adapter is wired in. The domain
//! only cares about the subject and the email, since the email is what Stripe
//! echoes back on a completed checkout.

use super::UserId;
use thiserror::Error;

/// Caller identity extracted from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identity provider subject.
    pub id: UserId,

    /// Email claim. Always present; tokens without one are rejected.
    pub email: String,

    /// `name` or `preferred_username` claim, when the provider sends one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    /// Email normalized for ledger matching.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

/// Lowercases and trims an address so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Errors raised while authenticating or authorizing a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Authenticated, but the caller has no active subscription.
    #[error("Active subscription required")]
    NotSubscribed,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client should obtain a fresh token.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "  Buyer@Example.COM ",
            Some("Buyer".to_string()),
        )
    }

    #[test]
    fn normalized_email_trims_and_lowercases() {
        assert_eq!(test_user().normalized_email(), "buyer@example.com");
    }

    #[test]
    fn normalize_email_is_idempotent() {
        let once = normalize_email("MiXeD@Example.com");
        assert_eq!(normalize_email(&once), once);
    }

    #[test]
    fn auth_error_service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(format!("{}", err), "Auth service unavailable: Connection refused");
    }

    #[test]
    fn requires_reauthentication_only_for_token_errors() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::NotSubscribed.requires_reauthentication());
        assert!(!AuthError::service_unavailable("x").requires_reauthentication());
    }
}
