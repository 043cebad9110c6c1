//! Subscription module - ledger records and Stripe webhook reconciliation.

mod reconciler;
mod record;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use reconciler::{reconcile, IgnoreReason, LedgerMutation};
pub use record::{StripeLink, Subscription};
pub use stripe_event::{StripeEvent, StripeEventData, StripeEventType};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};
