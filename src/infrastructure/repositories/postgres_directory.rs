// src/infrastructure/repositories/postgres_directory.rs
use super::map_sqlx;
use crate::application::ports::SubscriberDirectory;
use crate::domain::errors::DomainResult;
use crate::domain::notification::{AuthorId, SubscriberId, SubscriptionKey};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Subscriber and key lookups against the users service database.
#[derive(Clone)]
pub struct PostgresSubscriberDirectory {
    pool: PgPool,
}

impl PostgresSubscriberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberDirectory for PostgresSubscriberDirectory {
    async fn subscribers_of(&self, author_id: AuthorId) -> DomainResult<Vec<SubscriberId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            "SELECT subscriber_id FROM subscribers WHERE author_id = $1",
        )
        .bind(Uuid::from(author_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(collect_subscriber_ids(author_id, rows))
    }

    async fn subscription_keys(
        &self,
        subscriber_ids: &[SubscriberId],
    ) -> DomainResult<HashMap<SubscriberId, SubscriptionKey>> {
        if subscriber_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = subscriber_ids.iter().copied().map(Uuid::from).collect();
        let rows = sqlx::query_as::<_, (Uuid, Option<String>)>(
            "SELECT id, subscription_key FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut keys = HashMap::with_capacity(rows.len());
        for (id, raw_key) in rows {
            let Some(raw_key) = raw_key else { continue };
            // A blank key is as good as no key; treat it as absent.
            let Ok(key) = SubscriptionKey::new(raw_key) else {
                continue;
            };
            let Ok(subscriber_id) = SubscriberId::new(id) else {
                continue;
            };
            keys.insert(subscriber_id, key);
        }
        Ok(keys)
    }
}

/// A corrupt row (nil subscriber id) is skipped with a warning rather than
/// failing the lookup: failing would nack the event back onto the queue
/// forever over data this worker cannot repair.
fn collect_subscriber_ids(author_id: AuthorId, rows: Vec<Uuid>) -> Vec<SubscriberId> {
    let mut subscribers = Vec::with_capacity(rows.len());
    for id in rows {
        match SubscriberId::new(id) {
            Ok(subscriber_id) => subscribers.push(subscriber_id),
            Err(err) => {
                warn!(%author_id, error = %err, "skipping invalid subscriber row");
            }
        }
    }
    subscribers
}
