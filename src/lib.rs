//! Subscription Service - Stripe checkout and subscription ledger backend.
//!
//! Users start a hosted Stripe checkout, Stripe reports the outcome through
//! signed webhooks, and the service keeps one subscription record per user
//! in step with those events. Profile and subscription read views are
//! reserved to users holding a record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
