//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{normalize_email, AuthenticatedUser, DomainError, UserId};
use crate::ports::UserDirectory;

use super::map_db_error;

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserId>, DomainError> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to look up user"))?;

        id.map(|id| UserId::new(id).map_err(|e| DomainError::database(e.to_string())))
            .transpose()
    }

    async fn provision(&self, user: &AuthenticatedUser) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email
            "#,
        )
        .bind(user.id.as_str())
        .bind(user.normalized_email())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to provision user"))?;

        Ok(())
    }
}
