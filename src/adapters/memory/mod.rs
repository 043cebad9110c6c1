//! In-memory adapters for tests and database-less local runs.

mod profile_repository;
mod subscription_ledger;
mod user_directory;

pub use profile_repository::InMemoryProfileRepository;
pub use subscription_ledger::InMemorySubscriptionLedger;
pub use user_directory::InMemoryUserDirectory;
