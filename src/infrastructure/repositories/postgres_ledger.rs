// src/infrastructure/repositories/postgres_ledger.rs
use super::map_sqlx;
use crate::application::ports::NotificationLedger;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::notification::{ArticleId, SubscriberId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Append-only `notifications_sent` table in the worker database. The
/// unique constraint on `(subscriber_id, article_id)` is what enforces
/// at-most-once delivery across tasks and across worker processes.
#[derive(Clone)]
pub struct PostgresNotificationLedger {
    pool: PgPool,
}

impl PostgresNotificationLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLedger for PostgresNotificationLedger {
    async fn was_sent(
        &self,
        subscriber_id: SubscriberId,
        article_id: ArticleId,
    ) -> DomainResult<bool> {
        let row = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM notifications_sent
             WHERE subscriber_id = $1 AND article_id = $2
             LIMIT 1",
        )
        .bind(Uuid::from(subscriber_id))
        .bind(Uuid::from(article_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.is_some())
    }

    async fn mark_sent(
        &self,
        subscriber_id: SubscriberId,
        article_id: ArticleId,
    ) -> DomainResult<()> {
        let result = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO notifications_sent (subscriber_id, article_id)
             VALUES ($1, $2)
             RETURNING sent_at",
        )
        .bind(Uuid::from(subscriber_id))
        .bind(Uuid::from(article_id))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(sent_at) => {
                debug!(%subscriber_id, %article_id, %sent_at, "notification recorded");
                Ok(())
            }
            Err(err) => absorb_first_send_race(err, subscriber_id, article_id),
        }
    }
}

/// Turns a unique-pair violation into success: losing a first-send race to
/// a concurrent task or another worker means the pair is recorded, which is
/// all `mark_sent` promises. Anything else stays an error.
fn absorb_first_send_race(
    err: sqlx::Error,
    subscriber_id: SubscriberId,
    article_id: ArticleId,
) -> DomainResult<()> {
    match map_sqlx(err) {
        DomainError::Conflict(_) => {
            debug!(%subscriber_id, %article_id, "notification recorded concurrently");
            Ok(())
        }
        other => Err(other),
    }
}
