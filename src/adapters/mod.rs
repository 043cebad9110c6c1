//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - OIDC bearer token validation (and a mock)
//! - `http` - axum routes, middleware and application state
//! - `memory` - in-memory storage for tests and local runs
//! - `postgres` - sqlx-backed storage
//! - `stripe` - Stripe checkout API client (and a mock)

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
