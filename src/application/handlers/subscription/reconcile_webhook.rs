//! ReconcileWebhookHandler - Command handler for inbound Stripe webhooks.
//!
//! Verifies the delivery, asks the reconciler what the event means for the
//! ledger, then applies that mutation. Verification happens before any field
//! of the body is read, and nothing is written when it fails.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::{
    reconcile, IgnoreReason, LedgerMutation, StripeEvent, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{SubscriptionLedger, UserDirectory};

/// Raw webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Request body exactly as received.
    pub payload: Vec<u8>,

    /// `Stripe-Signature` header, if present.
    pub signature: Option<String>,
}

/// What a successfully handled delivery did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A user's record was created or overwritten.
    Linked {
        user_id: UserId,
        subscription_id: SubscriptionId,
    },

    /// A removal event was applied. `removed` is false when nothing matched.
    Unlinked { removed: bool },

    /// Verified, acknowledged, no mutation.
    Ignored { reason: IgnoreReason },
}

pub struct ReconcileWebhookHandler {
    verifier: StripeWebhookVerifier,
    ledger: Arc<dyn SubscriptionLedger>,
    directory: Arc<dyn UserDirectory>,
    require_livemode: bool,
}

impl ReconcileWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        ledger: Arc<dyn SubscriptionLedger>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            verifier,
            ledger,
            directory,
            require_livemode: false,
        }
    }

    /// Acknowledge test-mode events without applying them.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    pub async fn handle(
        &self,
        cmd: ReconcileWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let signature = cmd
            .signature
            .as_deref()
            .ok_or(WebhookError::MissingSignatureHeader)?;

        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected webhook delivery");
                e
            })?;

        let span = tracing::info_span!(
            "stripe_event",
            event_id = %event.id,
            event_type = %event.event_type
        );
        self.apply(&event).instrument(span).await
    }

    async fn apply(&self, event: &StripeEvent) -> Result<WebhookOutcome, WebhookError> {
        if self.require_livemode && !event.livemode {
            tracing::warn!("Ignoring test-mode event");
            return Ok(WebhookOutcome::Ignored {
                reason: IgnoreReason::TestModeEvent,
            });
        }

        match reconcile(event)? {
            LedgerMutation::LinkByEmail { email, link } => {
                let user_id = self
                    .directory
                    .find_by_email(&email)
                    .await
                    .map_err(storage_error)?
                    .ok_or_else(|| {
                        tracing::warn!(
                            stripe_customer_id = %link.customer_id,
                            stripe_subscription_id = %link.subscription_id,
                            "Completed checkout matches no local user"
                        );
                        WebhookError::UserNotMatched
                    })?;

                let record = self
                    .ledger
                    .upsert_for_user(&user_id, &link)
                    .await
                    .map_err(storage_error)?;

                tracing::info!(
                    user_id = %user_id,
                    stripe_subscription_id = %record.stripe_subscription_id,
                    "Subscription linked"
                );
                Ok(WebhookOutcome::Linked {
                    user_id,
                    subscription_id: record.id,
                })
            }
            LedgerMutation::UnlinkBySubscription { subscription_id } => {
                let removed = self
                    .ledger
                    .delete_by_stripe_subscription_id(&subscription_id)
                    .await
                    .map_err(storage_error)?;

                tracing::info!(stripe_subscription_id = %subscription_id, removed, "Subscription unlinked");
                Ok(WebhookOutcome::Unlinked { removed })
            }
            LedgerMutation::Nothing { reason } => {
                tracing::debug!(reason = reason.as_str(), "Event ignored");
                Ok(WebhookOutcome::Ignored { reason })
            }
        }
    }
}

fn storage_error(err: DomainError) -> WebhookError {
    if err.code == ErrorCode::Conflict {
        tracing::error!(error = %err, "Stripe ids already linked to another user");
    } else {
        tracing::error!(error = %err, "Ledger storage failed");
    }
    WebhookError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySubscriptionLedger, InMemoryUserDirectory};
    use crate::domain::subscription::{sign_payload, StripeLink};
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    struct Fixture {
        ledger: InMemorySubscriptionLedger,
        directory: InMemoryUserDirectory,
        handler: ReconcileWebhookHandler,
    }

    async fn fixture() -> Fixture {
        let ledger = InMemorySubscriptionLedger::new();
        let directory = InMemoryUserDirectory::new();
        directory
            .insert(UserId::new("user-1").unwrap(), "buyer@example.com")
            .await;
        let handler = ReconcileWebhookHandler::new(
            StripeWebhookVerifier::new(SECRET),
            Arc::new(ledger.clone()),
            Arc::new(directory.clone()),
        );
        Fixture {
            ledger,
            directory,
            handler,
        }
    }

    fn signed(event_type: &str, object: serde_json::Value) -> ReconcileWebhookCommand {
        let body = json!({
            "id": "evt_1",
            "type": event_type,
            "created": 1717000000,
            "livemode": false,
            "data": { "object": object }
        })
        .to_string();
        let t = chrono::Utc::now().timestamp();
        ReconcileWebhookCommand {
            signature: Some(format!("t={},v1={}", t, sign_payload(SECRET, t, body.as_bytes()))),
            payload: body.into_bytes(),
        }
    }

    fn completion(email: &str, sub: &str) -> ReconcileWebhookCommand {
        signed(
            "checkout.session.completed",
            json!({ "customer": "cus_1", "subscription": sub, "customer_email": email }),
        )
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Completion
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn completion_links_matching_user() {
        let f = fixture().await;

        let outcome = f.handler.handle(completion("Buyer@Example.com", "sub_1")).await.unwrap();

        assert!(matches!(outcome, WebhookOutcome::Linked { ref user_id, .. } if *user_id == user()));
        let record = f.ledger.find_by_user(&user()).await.unwrap().unwrap();
        assert_eq!(record.stripe_customer_id, "cus_1");
        assert_eq!(record.stripe_subscription_id, "sub_1");
    }

    #[tokio::test]
    async fn completion_for_unknown_email_changes_nothing() {
        let f = fixture().await;

        let err = f.handler.handle(completion("stranger@example.com", "sub_1")).await.unwrap_err();

        assert_eq!(err, WebhookError::UserNotMatched);
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn replayed_completion_keeps_one_record_and_created_at() {
        let f = fixture().await;

        f.handler.handle(completion("buyer@example.com", "sub_1")).await.unwrap();
        let first = f.ledger.find_by_user(&user()).await.unwrap().unwrap();
        f.handler.handle(completion("buyer@example.com", "sub_1")).await.unwrap();
        let second = f.ledger.find_by_user(&user()).await.unwrap().unwrap();

        assert_eq!(f.ledger.len().await, 1);
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
    }

    #[tokio::test]
    async fn ids_owned_by_another_user_are_a_storage_error() {
        let f = fixture().await;
        f.directory
            .insert(UserId::new("user-2").unwrap(), "other@example.com")
            .await;
        f.handler.handle(completion("buyer@example.com", "sub_1")).await.unwrap();

        let err = f.handler.handle(completion("other@example.com", "sub_1")).await.unwrap_err();

        assert!(err.is_retryable());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Removal
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscription_deleted_removes_record() {
        let f = fixture().await;
        f.ledger
            .upsert_for_user(&user(), &StripeLink::new("cus_1", "sub_1").unwrap())
            .await
            .unwrap();

        let outcome = f
            .handler
            .handle(signed("customer.subscription.deleted", json!({ "id": "sub_1" })))
            .await
            .unwrap();

        assert_eq!(outcome, WebhookOutcome::Unlinked { removed: true });
        assert!(!f.ledger.exists_for_user(&user()).await.unwrap());
    }

    #[tokio::test]
    async fn payment_failed_removes_record_by_invoice_subscription() {
        let f = fixture().await;
        f.ledger
            .upsert_for_user(&user(), &StripeLink::new("cus_1", "sub_1").unwrap())
            .await
            .unwrap();

        let outcome = f
            .handler
            .handle(signed(
                "invoice.payment_failed",
                json!({ "id": "in_1", "subscription": "sub_1" }),
            ))
            .await
            .unwrap();

        assert_eq!(outcome, WebhookOutcome::Unlinked { removed: true });
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn removal_of_unknown_subscription_is_a_no_op() {
        let f = fixture().await;

        let outcome = f
            .handler
            .handle(signed("customer.subscription.deleted", json!({ "id": "sub_x" })))
            .await
            .unwrap();

        assert_eq!(outcome, WebhookOutcome::Unlinked { removed: false });
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections and ignores
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_signature_is_rejected_before_parsing() {
        let f = fixture().await;
        let mut cmd = completion("buyer@example.com", "sub_1");
        cmd.signature = None;

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert_eq!(err, WebhookError::MissingSignatureHeader);
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn tampered_body_is_rejected_without_mutation() {
        let f = fixture().await;
        let mut cmd = completion("buyer@example.com", "sub_1");
        cmd.payload = String::from_utf8(cmd.payload)
            .unwrap()
            .replace("sub_1", "sub_2")
            .into_bytes();

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert_eq!(err, WebhookError::InvalidSignature);
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn unrelated_event_is_ignored() {
        let f = fixture().await;

        let outcome = f
            .handler
            .handle(signed("customer.created", json!({ "id": "cus_1" })))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                reason: IgnoreReason::UnhandledEventType
            }
        );
    }

    #[tokio::test]
    async fn test_mode_event_is_ignored_when_livemode_required() {
        let f = fixture().await;
        let handler = ReconcileWebhookHandler::new(
            StripeWebhookVerifier::new(SECRET),
            Arc::new(f.ledger.clone()),
            Arc::new(f.directory.clone()),
        )
        .with_require_livemode(true);

        let outcome = handler.handle(completion("buyer@example.com", "sub_1")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                reason: IgnoreReason::TestModeEvent
            }
        );
        assert!(f.ledger.is_empty().await);
    }

    #[tokio::test]
    async fn ledger_failure_is_retryable() {
        let f = fixture().await;
        f.ledger.set_failing(true);

        let err = f.handler.handle(completion("buyer@example.com", "sub_1")).await.unwrap_err();

        assert!(matches!(err, WebhookError::Storage(_)));
        assert!(err.is_retryable());
    }
}
