//! Subscription HTTP module - webhook, checkout and the subscription read view.

pub mod dto;
pub mod handlers;
mod routes;

pub use routes::subscription_routes;
