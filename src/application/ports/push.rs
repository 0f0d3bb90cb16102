use crate::application::retry::RetryableError;
use crate::domain::notification::{NotificationMessage, SubscriberId, SubscriptionKey};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of one outbound push attempt.
#[derive(Debug, Error)]
pub enum PushError {
    /// Transport-level failure: connect error, timeout, broken stream.
    #[error("network failure: {0}")]
    Network(String),
    /// The push service answered with a non-2xx status. Retrying cannot
    /// help; the request itself is unacceptable.
    #[error("push rejected with status {0}")]
    Rejected(u16),
}

impl RetryableError for PushError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Outbound push call, one subscriber at a time.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send(
        &self,
        subscriber_id: SubscriberId,
        key: &SubscriptionKey,
        message: &NotificationMessage,
    ) -> Result<(), PushError>;
}
