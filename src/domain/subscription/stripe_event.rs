//! Stripe webhook event envelope.
//!
//! Only the envelope fields are typed. The `data.object` payload stays a
//! `serde_json::Value` and the reconciler picks the few fields it needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event. Null for some account events.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: Value,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Looks up a string field on `data.object` by a dotted path.
    ///
    /// Returns `None` for missing keys, JSON null, non-string leaves and
    /// empty strings.
    pub fn object_str(&self, path: &str) -> Option<&str> {
        let mut current = &self.data.object;
        for key in path.split('.') {
            current = current.get(key)?;
        }
        current.as_str().filter(|s| !s.is_empty())
    }
}

/// Event types the reconciler acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    CheckoutSessionCompleted,
    CustomerSubscriptionDeleted,
    InvoicePaymentFailed,
    /// Anything else. Acknowledged without effect.
    Other,
}

impl StripeEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Other => "other",
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
            api_version: Some("2024-06-20".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_envelope() {
        let payload = r#"{"id":"evt_1","type":"invoice.payment_failed","data":{"object":{"id":"in_1"}}}"#;
        let event: StripeEvent = serde_json::from_str(payload).unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.parsed_type(), StripeEventType::InvoicePaymentFailed);
        assert!(!event.livemode);
        assert!(event.api_version.is_none());
    }

    #[test]
    fn envelope_without_data_is_rejected() {
        let payload = r#"{"id":"evt_1","type":"invoice.payment_failed"}"#;
        assert!(serde_json::from_str::<StripeEvent>(payload).is_err());
    }

    #[test]
    fn unknown_types_parse_as_other() {
        assert_eq!(
            StripeEventType::parse("customer.subscription.updated"),
            StripeEventType::Other
        );
        assert_eq!(StripeEventType::parse(""), StripeEventType::Other);
    }

    #[test]
    fn known_types_round_trip_through_as_str() {
        for t in [
            StripeEventType::CheckoutSessionCompleted,
            StripeEventType::CustomerSubscriptionDeleted,
            StripeEventType::InvoicePaymentFailed,
        ] {
            assert_eq!(StripeEventType::parse(t.as_str()), t);
        }
    }

    #[test]
    fn object_str_follows_dotted_paths() {
        let event = StripeEventBuilder::new()
            .object(json!({
                "customer": "cus_1",
                "customer_details": { "email": "a@b.com" },
                "subscription": null,
                "amount_total": 100,
                "customer_email": ""
            }))
            .build();

        assert_eq!(event.object_str("customer"), Some("cus_1"));
        assert_eq!(event.object_str("customer_details.email"), Some("a@b.com"));
        assert_eq!(event.object_str("subscription"), None);
        assert_eq!(event.object_str("amount_total"), None);
        assert_eq!(event.object_str("customer_email"), None);
        assert_eq!(event.object_str("missing.deeper"), None);
    }
}
