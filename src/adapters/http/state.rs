//! Shared application state for the HTTP adapters.

use std::sync::Arc;

use crate::application::{
    CreateCheckoutHandler, GetProfileHandler, GetSubscriptionHandler, ReconcileWebhookHandler,
    UpdateProfileHandler,
};
use crate::domain::subscription::StripeWebhookVerifier;
use crate::ports::{
    PaymentProvider, ProfileRepository, SessionValidator, SubscriptionLedger, UserDirectory,
};

/// Port implementations plus the settings handlers need.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn SubscriptionLedger>,
    pub directory: Arc<dyn UserDirectory>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub webhook_verifier: StripeWebhookVerifier,
    /// Frontend URL used to build checkout redirect targets.
    pub base_url: String,
    pub require_livemode: bool,
}

impl AppState {
    pub fn reconcile_webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.ledger.clone(),
            self.directory.clone(),
        )
        .with_require_livemode(self.require_livemode)
    }

    pub fn create_checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.payment_provider.clone(),
            self.directory.clone(),
            self.base_url.clone(),
        )
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.ledger.clone())
    }

    pub fn get_profile_handler(&self) -> GetProfileHandler {
        GetProfileHandler::new(self.profiles.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.profiles.clone())
    }
}
