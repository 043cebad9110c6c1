//! CreateCheckoutHandler - Command handler for starting a subscription checkout.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, UserDirectory};

#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user: AuthenticatedUser,
    pub price_id: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("price_id is required")]
    MissingPriceId,

    /// The provider refused or failed; the message is the provider's own.
    #[error("{}", .0.message)]
    Provider(PaymentError),

    #[error("Failed to record user: {0}")]
    Directory(DomainError),
}

/// Creates a hosted checkout session for the caller.
///
/// The caller is provisioned in the user directory first so the completion
/// webhook can match the purchaser email back to them.
pub struct CreateCheckoutHandler {
    provider: Arc<dyn PaymentProvider>,
    directory: Arc<dyn UserDirectory>,
    base_url: String,
}

impl CreateCheckoutHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        directory: Arc<dyn UserDirectory>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            directory,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CheckoutSession, CheckoutError> {
        let price_id = cmd
            .price_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or(CheckoutError::MissingPriceId)?;

        self.directory
            .provision(&cmd.user)
            .await
            .map_err(CheckoutError::Directory)?;

        let request = CreateCheckoutRequest {
            price_id,
            customer_email: cmd.user.email.clone(),
            success_url: format!("{}/dashboard", self.base_url),
            cancel_url: format!("{}/", self.base_url),
            automatic_tax: true,
            allow_promotion_codes: true,
        };

        let session = self
            .provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %cmd.user.id, error = %e, "Checkout session creation failed");
                CheckoutError::Provider(e)
            })?;

        tracing::info!(user_id = %cmd.user.id, session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}
