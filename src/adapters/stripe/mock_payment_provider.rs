//! Mock payment provider for testing.
//!
//! Records every checkout request and returns either a generated session or
//! an injected error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_error(PaymentError::invalid_request("No such price"));
///
/// let result = mock.create_checkout_session(request).await;
/// assert!(result.is_err());
/// assert_eq!(mock.checkout_requests().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Returned instead of a generated session when set.
    next_checkout: Option<CheckoutSession>,

    /// Returned on the next call only.
    next_error: Option<PaymentError>,

    /// Requests received, oldest first.
    checkout_requests: Vec<CreateCheckoutRequest>,

    sessions_created: u64,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fixes the session returned by subsequent calls.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    /// Makes the next call fail with `error`.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Requests received so far.
    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.state().checkout_requests.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.state();
        state.checkout_requests.push(request);

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(session) = state.next_checkout.clone() {
            return Ok(session);
        }

        state.sessions_created += 1;
        let id = format!("cs_test_{}", state.sessions_created);
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
        })
    }
}
