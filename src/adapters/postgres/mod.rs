//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionLedger` - `subscriptions` table
//! - `PostgresUserDirectory` - `users` table
//! - `PostgresProfileRepository` - `user_profiles` table

mod profile_repository;
mod subscription_ledger;
mod user_directory;

pub use profile_repository::PostgresProfileRepository;
pub use subscription_ledger::PostgresSubscriptionLedger;
pub use user_directory::PostgresUserDirectory;

use crate::domain::foundation::DomainError;

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a sqlx error to a domain error, surfacing unique violations as
/// `Conflict` with the constraint name attached.
fn map_db_error(err: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return DomainError::conflict(constraint, format!("{}: {}", context, db_err.message()));
        }
    }
    DomainError::database(format!("{}: {}", context, err))
}
