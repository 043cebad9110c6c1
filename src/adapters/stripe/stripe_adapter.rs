//! Stripe payment provider adapter.
//!
//! Talks to the Stripe REST API with form-encoded requests and basic auth,
//! as Stripe expects. Only hosted checkout session creation is needed; the
//! subscription outcome arrives later as a signed webhook.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::subscription::StripeWebhookVerifier;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (stripe-mock, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Builds the signature verifier for this endpoint's secret.
    pub fn webhook_verifier(&self) -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(self.webhook_secret.expose_secret().clone())
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("webhook_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Fields we read from a created checkout session.
#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    url: Option<String>,
}

/// Stripe's error envelope: `{"error": {"message": ..., "code": ...}}`.
#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Form parameters for `POST /v1/checkout/sessions`.
fn checkout_params(request: &CreateCheckoutRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("customer_email", request.customer_email.clone()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ];
    if request.automatic_tax {
        params.push(("automatic_tax[enabled]", "true".to_string()));
    }
    if request.allow_promotion_codes {
        params.push(("allow_promotion_codes", "true".to_string()));
    }
    params
}

/// Converts a non-success Stripe response into a `PaymentError`, keeping
/// Stripe's own message when the body carries one.
fn error_from_response(status: u16, body: &str) -> PaymentError {
    let code = PaymentErrorCode::from_status(status);
    match serde_json::from_str::<StripeErrorEnvelope>(body) {
        Ok(StripeErrorEnvelope {
            error:
                StripeErrorBody {
                    message: Some(message),
                    code: provider_code,
                },
        }) => {
            let err = PaymentError::new(code, message);
            match provider_code {
                Some(pc) => err.with_provider_code(pc),
                None => err,
            }
        }
        _ => PaymentError::new(code, format!("Stripe API error (status {})", status)),
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&checkout_params(&request))
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                code = %err.code,
                provider_code = ?err.provider_code,
                "Stripe rejected checkout session"
            );
            return Err(err);
        }

        let session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::provider("Stripe returned a session without a URL"))?;

        tracing::info!(session_id = %session.id, "Created Stripe checkout session");
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}
