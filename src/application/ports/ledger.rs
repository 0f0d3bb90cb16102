use crate::domain::errors::DomainResult;
use crate::domain::notification::{ArticleId, SubscriberId};
use async_trait::async_trait;

/// Durable record of `(subscriber, article)` pairs already notified.
///
/// The ledger is the sole source of truth for duplicate suppression: queue
/// redelivery and concurrent workers both funnel through its uniqueness
/// constraint, never through in-process locks.
#[async_trait]
pub trait NotificationLedger: Send + Sync {
    async fn was_sent(
        &self,
        subscriber_id: SubscriberId,
        article_id: ArticleId,
    ) -> DomainResult<bool>;

    /// Record a successful delivery. Implementations must treat an insert
    /// that collides with an existing record as success: another task or
    /// process got there first, which is exactly the state we wanted.
    async fn mark_sent(
        &self,
        subscriber_id: SubscriberId,
        article_id: ArticleId,
    ) -> DomainResult<()>;
}
