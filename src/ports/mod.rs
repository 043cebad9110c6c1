//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionLedger` - one subscription record per user
//! - `UserDirectory` - email to user lookup for webhook matching
//! - `ProfileRepository` - user-editable profile fields
//! - `PaymentProvider` - hosted checkout sessions
//! - `SessionValidator` - bearer token validation

mod payment_provider;
mod profile_repository;
mod session_validator;
mod subscription_ledger;
mod user_directory;

pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use profile_repository::ProfileRepository;
pub use session_validator::SessionValidator;
pub use subscription_ledger::SubscriptionLedger;
pub use user_directory::UserDirectory;
