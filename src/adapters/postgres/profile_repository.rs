//! PostgreSQL implementation of ProfileRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::user::UserProfile;
use crate::ports::ProfileRepository;

use super::map_db_error;

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    display_name: Option<String>,
    bio: Option<String>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT user_id, display_name, bio, updated_at FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load profile"))?;

        row.map(|row| {
            let user_id = UserId::new(row.user_id)
                .map_err(|e| DomainError::database(format!("Invalid user_id: {}", e)))?;
            Ok(UserProfile::reconstitute(
                user_id,
                row.display_name,
                row.bio,
                Timestamp::from_datetime(row.updated_at),
            ))
        })
        .transpose()
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let updated_at = profile.updated_at.unwrap_or_else(Timestamp::now);

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, display_name, bio, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                bio = EXCLUDED.bio,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(profile.display_name())
        .bind(profile.bio())
        .bind(updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to save profile"))?;

        Ok(())
    }
}
