//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write, query handlers read.

pub mod handlers;

pub use handlers::profile::{
    GetProfileHandler, GetProfileQuery, ProfileError, UpdateProfileCommand, UpdateProfileHandler,
};
pub use handlers::subscription::{
    CheckSubscribedHandler, CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler,
    GetSubscriptionHandler, GetSubscriptionQuery, ReconcileWebhookCommand,
    ReconcileWebhookHandler, WebhookOutcome,
};
