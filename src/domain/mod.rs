//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, caller identity, errors)
//! - `subscription` - Ledger records, webhook verification and reconciliation
//! - `user` - User profile fields

pub mod foundation;
pub mod subscription;
pub mod user;
