//! HTTP middleware for axum.
//!
//! - `auth` - bearer token validation and the `RequireAuth` extractor
//! - `subscription_gate` - 403 for callers without a subscription record

pub mod auth;
pub mod subscription_gate;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
pub use subscription_gate::{require_subscription, GateState};
