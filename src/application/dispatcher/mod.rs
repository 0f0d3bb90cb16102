// src/application/dispatcher/mod.rs
mod task;

pub use task::TaskOutcome;
use task::NotificationTask;

use crate::application::ports::{
    ArticleCatalog, NotificationLedger, PushGateway, SubscriberDirectory,
};
use crate::application::retry::RetryPolicy;
use crate::domain::errors::DomainResult;
use crate::domain::event::PublishedArticleEvent;
use crate::domain::notification::NotificationMessage;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Tally of terminal task states for one dispatched event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub already_sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Orchestrates delivery of one published article to every subscriber of
/// its author: resolves the subscriber set and keys, composes the message,
/// and drives bounded-concurrency notification tasks to completion.
pub struct Dispatcher {
    directory: Arc<dyn SubscriberDirectory>,
    catalog: Arc<dyn ArticleCatalog>,
    ledger: Arc<dyn NotificationLedger>,
    push: Arc<dyn PushGateway>,
    retry: RetryPolicy,
    concurrency: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(
        directory: Arc<dyn SubscriberDirectory>,
        catalog: Arc<dyn ArticleCatalog>,
        ledger: Arc<dyn NotificationLedger>,
        push: Arc<dyn PushGateway>,
        retry: RetryPolicy,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            directory,
            catalog,
            ledger,
            push,
            retry,
            concurrency: Arc::new(Semaphore::new(concurrency_limit)),
        }
    }

    /// Process one event to completion. Returns only after every launched
    /// task reached a terminal state, so the caller can acknowledge the
    /// inbound message knowing nothing is still in flight.
    ///
    /// Per-subscriber delivery failures are absorbed into the summary; an
    /// `Err` here means a collaborator lookup itself failed (the directory,
    /// the catalog, or a ledger read before any push went out) and the
    /// event should go back to the queue.
    pub async fn dispatch(&self, event: &PublishedArticleEvent) -> DomainResult<DispatchSummary> {
        let author_id = event.author_id;
        let article_id = event.article_id;

        let mut summary = DispatchSummary::default();
        let subscribers = self.directory.subscribers_of(author_id).await?;
        if subscribers.is_empty() {
            info!(%author_id, %article_id, "no subscribers for author");
            return Ok(summary);
        }

        let keys = self.directory.subscription_keys(&subscribers).await?;
        let title = self.catalog.title_of(article_id).await?;
        if title.is_none() {
            warn!(%article_id, "article title not found, sending degraded message");
        }
        let message = NotificationMessage::compose(title.as_deref(), author_id);

        let task = NotificationTask::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.push),
            self.retry.clone(),
        );

        let mut tasks = JoinSet::new();
        for subscriber_id in subscribers {
            let Some(key) = keys.get(&subscriber_id).cloned() else {
                warn!(%author_id, %subscriber_id, "subscriber has no subscription key, skipping");
                summary.skipped += 1;
                continue;
            };

            let task = task.clone();
            let message = message.clone();
            let gate = Arc::clone(&self.concurrency);
            tasks.spawn(async move {
                let Ok(_permit) = gate.acquire_owned().await else {
                    return Ok(TaskOutcome::Failed);
                };
                task.run(subscriber_id, author_id, article_id, key, message)
                    .await
            });
        }

        // Every task must reach a terminal state before a ledger outage is
        // allowed to surface, so nothing is left in flight when the caller
        // nacks the event.
        let mut ledger_outage = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(TaskOutcome::Delivered)) => summary.delivered += 1,
                Ok(Ok(TaskOutcome::AlreadySent)) => summary.already_sent += 1,
                Ok(Ok(TaskOutcome::Failed)) => summary.failed += 1,
                Ok(Err(err)) => ledger_outage = Some(err),
                Err(err) => {
                    error!(%author_id, %article_id, error = %err, "notification task panicked");
                    summary.failed += 1;
                }
            }
        }

        if let Some(err) = ledger_outage {
            error!(%author_id, %article_id, error = %err, "ledger unavailable, returning event to the queue");
            return Err(err);
        }

        info!(
            %author_id,
            %article_id,
            delivered = summary.delivered,
            already_sent = summary.already_sent,
            skipped = summary.skipped,
            failed = summary.failed,
            "event dispatched"
        );
        Ok(summary)
    }
}
