//! Authentication adapters implementing `SessionValidator`.
//!
//! - `oidc` - JWKS-backed JWT validation against the external provider
//! - `mock` - fixed token map for tests and local runs

mod mock;
mod oidc;

pub use mock::MockSessionValidator;
pub use oidc::{OidcConfig, OidcSessionValidator};
