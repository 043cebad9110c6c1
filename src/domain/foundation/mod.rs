//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, caller identity and the error vocabulary used by
//! every other module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{normalize_email, AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{SubscriptionId, UserId};
pub use timestamp::Timestamp;
