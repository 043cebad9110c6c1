//! Subscription command and query handlers.

mod check_subscribed;
mod create_checkout;
mod get_subscription;
mod reconcile_webhook;

pub use check_subscribed::CheckSubscribedHandler;
pub use create_checkout::{CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler};
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery};
pub use reconcile_webhook::{ReconcileWebhookCommand, ReconcileWebhookHandler, WebhookOutcome};
