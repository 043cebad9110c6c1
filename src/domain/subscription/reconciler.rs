//! Maps a verified Stripe event to the ledger mutation it implies.
//!
//! This is a pure function of the event. Looking up the user and touching
//! storage is the application layer's job.

use crate::domain::foundation::normalize_email;

use super::record::StripeLink;
use super::stripe_event::{StripeEvent, StripeEventType};
use super::webhook_errors::WebhookError;

/// Ledger change a verified event asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerMutation {
    /// Create or overwrite the record of whichever user owns `email`.
    LinkByEmail { email: String, link: StripeLink },

    /// Remove the record carrying this Stripe subscription id, if any.
    UnlinkBySubscription { subscription_id: String },

    /// Event is acknowledged without touching the ledger.
    Nothing { reason: IgnoreReason },
}

/// Why an event produced no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Event type the ledger does not track.
    UnhandledEventType,
    /// Completed checkout that did not create a subscription.
    NotASubscriptionCheckout,
    /// Failed invoice not tied to a subscription.
    InvoiceWithoutSubscription,
    /// Subscription deletion whose object carries no id.
    DeletionWithoutSubscription,
    /// Test-mode event delivered while live mode is required.
    TestModeEvent,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::UnhandledEventType => "unhandled_event_type",
            IgnoreReason::NotASubscriptionCheckout => "not_a_subscription_checkout",
            IgnoreReason::InvoiceWithoutSubscription => "invoice_without_subscription",
            IgnoreReason::DeletionWithoutSubscription => "deletion_without_subscription",
            IgnoreReason::TestModeEvent => "test_mode_event",
        }
    }
}

/// Decides the ledger mutation for a verified event.
///
/// # Errors
///
/// `UserNotMatched` when a subscription checkout carries no purchaser email.
pub fn reconcile(event: &StripeEvent) -> Result<LedgerMutation, WebhookError> {
    match event.parsed_type() {
        StripeEventType::CheckoutSessionCompleted => checkout_completed(event),
        StripeEventType::CustomerSubscriptionDeleted => Ok(match event.object_str("id") {
            Some(id) => LedgerMutation::UnlinkBySubscription {
                subscription_id: id.to_string(),
            },
            None => LedgerMutation::Nothing {
                reason: IgnoreReason::DeletionWithoutSubscription,
            },
        }),
        StripeEventType::InvoicePaymentFailed => Ok(invoice_payment_failed(event)),
        StripeEventType::Other => Ok(LedgerMutation::Nothing {
            reason: IgnoreReason::UnhandledEventType,
        }),
    }
}

fn checkout_completed(event: &StripeEvent) -> Result<LedgerMutation, WebhookError> {
    let link = match (event.object_str("customer"), event.object_str("subscription")) {
        (Some(customer), Some(subscription)) => StripeLink::new(customer, subscription).ok(),
        _ => None,
    };
    // Checked before the purchaser email: a one-off payment is acknowledged
    // even when no local user owns the email.
    let Some(link) = link else {
        return Ok(LedgerMutation::Nothing {
            reason: IgnoreReason::NotASubscriptionCheckout,
        });
    };

    let email = event
        .object_str("customer_email")
        .or_else(|| event.object_str("customer_details.email"))
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or(WebhookError::UserNotMatched)?;

    Ok(LedgerMutation::LinkByEmail { email, link })
}

fn invoice_payment_failed(event: &StripeEvent) -> LedgerMutation {
    // API versions from 2025 onward moved the field under `parent`.
    let subscription_id = event
        .object_str("subscription")
        .or_else(|| event.object_str("parent.subscription_details.subscription"));

    match subscription_id {
        Some(id) => LedgerMutation::UnlinkBySubscription {
            subscription_id: id.to_string(),
        },
        None => LedgerMutation::Nothing {
            reason: IgnoreReason::InvoiceWithoutSubscription,
        },
    }
}
