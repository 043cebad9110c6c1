//! PostgreSQL implementation of SubscriptionLedger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{StripeLink, Subscription};
use crate::ports::SubscriptionLedger;

use super::map_db_error;

/// PostgreSQL implementation of the SubscriptionLedger port.
pub struct PostgresSubscriptionLedger {
    pool: PgPool,
}

impl PostgresSubscriptionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: String,
    stripe_customer_id: String,
    stripe_subscription_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::database(format!("Invalid user_id: {}", e)))?,
            stripe_customer_id: row.stripe_customer_id,
            stripe_subscription_id: row.stripe_subscription_id,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl SubscriptionLedger for PostgresSubscriptionLedger {
    async fn upsert_for_user(
        &self,
        user_id: &UserId,
        link: &StripeLink,
    ) -> Result<Subscription, DomainError> {
        // created_at is left out of the update list so the first insert's
        // value survives.
        let row: SubscriptionRow = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (id, user_id, stripe_customer_id, stripe_subscription_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_subscription_id = EXCLUDED.stripe_subscription_id
            RETURNING id, user_id, stripe_customer_id, stripe_subscription_id, created_at
            "#,
        )
        .bind(*SubscriptionId::new().as_uuid())
        .bind(user_id.as_str())
        .bind(&link.customer_id)
        .bind(&link.subscription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to upsert subscription"))?;

        row.try_into()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, stripe_customer_id, stripe_subscription_id, created_at
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load subscription"))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn exists_for_user(&self, user_id: &UserId) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM subscriptions WHERE user_id = $1)")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to check subscription"))
    }

    async fn delete_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE stripe_subscription_id = $1")
            .bind(stripe_subscription_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to delete subscription"))?;

        Ok(result.rows_affected() > 0)
    }
}
