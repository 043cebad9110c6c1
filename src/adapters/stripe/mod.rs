//! Stripe payment provider adapter.
//!
//! - `StripePaymentAdapter` creates hosted checkout sessions over the REST API
//! - `MockPaymentProvider` records requests for tests
//!
//! Webhook signature verification lives in the domain
//! (`StripeWebhookVerifier`); `StripeConfig` builds one from its secret.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
