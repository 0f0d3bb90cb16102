use crate::application::ports::{NotificationLedger, PushGateway};
use crate::application::retry::RetryPolicy;
use crate::domain::errors::DomainResult;
use crate::domain::notification::{
    ArticleId, AuthorId, NotificationMessage, SubscriberId, SubscriptionKey,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Terminal state of one per-subscriber notification task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Delivered,
    AlreadySent,
    Failed,
}

/// Per-subscriber unit of work: ledger check, delivery attempt, ledger
/// update. Fully self-contained so one subscriber's failure never leaks
/// into another's.
#[derive(Clone)]
pub(crate) struct NotificationTask {
    ledger: Arc<dyn NotificationLedger>,
    push: Arc<dyn PushGateway>,
    retry: RetryPolicy,
}

impl NotificationTask {
    pub(crate) fn new(
        ledger: Arc<dyn NotificationLedger>,
        push: Arc<dyn PushGateway>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            ledger,
            push,
            retry,
        }
    }

    /// An `Err` is only returned for a ledger read failure, before any push
    /// attempt: nothing has been delivered yet, so the caller must send the
    /// event back to the queue instead of acking it away. Failures after
    /// the push stay contained in `TaskOutcome::Failed`.
    pub(crate) async fn run(
        &self,
        subscriber_id: SubscriberId,
        author_id: AuthorId,
        article_id: ArticleId,
        key: SubscriptionKey,
        message: NotificationMessage,
    ) -> DomainResult<TaskOutcome> {
        match self.ledger.was_sent(subscriber_id, article_id).await {
            Ok(true) => {
                debug!(%subscriber_id, %article_id, "notification already recorded, skipping");
                return Ok(TaskOutcome::AlreadySent);
            }
            Ok(false) => {}
            Err(err) => {
                error!(%author_id, %subscriber_id, %article_id, error = %err, "ledger lookup failed");
                return Err(err);
            }
        }

        if let Err(err) = self
            .retry
            .run(|| self.push.send(subscriber_id, &key, &message))
            .await
        {
            // No ledger record is written, so this pair stays eligible for
            // a future attempt via queue redelivery.
            error!(%author_id, %subscriber_id, %article_id, error = %err, "push delivery failed");
            return Ok(TaskOutcome::Failed);
        }

        match self.ledger.mark_sent(subscriber_id, article_id).await {
            Ok(()) => {
                info!(%author_id, %subscriber_id, %article_id, "push sent");
                Ok(TaskOutcome::Delivered)
            }
            Err(err) => {
                error!(%author_id, %subscriber_id, %article_id, error = %err, "failed to record notification");
                Ok(TaskOutcome::Failed)
            }
        }
    }
}
