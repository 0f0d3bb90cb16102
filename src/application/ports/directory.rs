use crate::domain::errors::DomainResult;
use crate::domain::notification::{AuthorId, SubscriberId, SubscriptionKey};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read-only view of the subscription graph owned by the users service.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// All subscribers following `author_id`. Empty set means the event is
    /// fully handled with zero deliveries.
    async fn subscribers_of(&self, author_id: AuthorId) -> DomainResult<Vec<SubscriberId>>;

    /// Subscription keys for the given subscribers in one batched lookup.
    /// Subscribers without a usable key are simply absent from the map.
    async fn subscription_keys(
        &self,
        subscriber_ids: &[SubscriberId],
    ) -> DomainResult<HashMap<SubscriberId, SubscriptionKey>>;
}
