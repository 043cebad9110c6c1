//! Stripe webhook signature verification.
//!
//! Stripe signs `"{t}.{raw body}"` with HMAC-SHA256 and the endpoint secret.
//! Nothing in the body is trusted until a `v1` signature matches and the
//! signed timestamp falls inside the replay window.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// All `v1` signatures. Stripe sends more than one while a secret rolls.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`.
    /// Unknown keys, including `v0`, are ignored, as are segments without
    /// `=` and `v1` values that are not hex. Parsing fails only when the
    /// timestamp is missing or unparsable, or no usable `v1` is left.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for (key, value) in header.split(',').filter_map(|part| part.trim().split_once('=')) {
            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| malformed("invalid timestamp"))?);
                }
                "v1" => {
                    if let Ok(sig) = hex::decode(value) {
                        v1_signatures.push(sig);
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| malformed("missing timestamp"))?;
        if v1_signatures.is_empty() {
            return Err(malformed("missing v1 signature"));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

fn malformed(reason: &str) -> WebhookError {
    WebhookError::MalformedSignatureHeader(reason.to_string())
}

/// Verifier for Stripe webhook signatures.
#[derive(Clone)]
pub struct StripeWebhookVerifier {
    secret: String,
}

impl std::fmt::Debug for StripeWebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeWebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the endpoint's signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature against the current clock and parses the event.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        self.verify_and_parse_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Verifies the signature as of `now` (Unix seconds) and parses the event.
    ///
    /// The header is parsed first, then the timestamp window is checked, then
    /// the signatures are compared. The payload is only deserialized after all
    /// three succeed.
    pub fn verify_and_parse_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        validate_timestamp(header.timestamp, now)?;

        let expected = self.compute_signature(header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    /// HMAC-SHA256 over the raw bytes of `"{timestamp}.{payload}"`.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), WebhookError> {
    let age = now.saturating_sub(timestamp);

    if age > MAX_EVENT_AGE_SECS {
        return Err(WebhookError::TimestampOutOfRange);
    }
    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(WebhookError::InvalidTimestamp);
    }

    Ok(())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signs a payload the way Stripe does. Shared by unit and integration tests.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
