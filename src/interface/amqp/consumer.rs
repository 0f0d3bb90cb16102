// src/interface/amqp/consumer.rs
use crate::application::dispatcher::Dispatcher;
use crate::domain::event::PublishedArticleEvent;
use futures::StreamExt;
use lapin::message::Delivery;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, BasicRejectOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const CONSUMER_TAG: &str = "herald-worker";

/// Consumes "article published" events from a durable queue and feeds them
/// to the dispatcher, one at a time.
///
/// Acknowledgment policy: a malformed payload is rejected permanently
/// (retrying cannot fix it); a valid event is acked only after the
/// dispatcher has driven every notification task to a terminal state; a
/// dispatch that failed on a collaborator lookup is nacked back onto the
/// queue for redelivery.
pub struct EventConsumer {
    amqp_url: String,
    queue: String,
    reconnect_delay: Duration,
    dispatcher: Arc<Dispatcher>,
}

impl EventConsumer {
    pub fn new(
        amqp_url: String,
        queue: String,
        reconnect_delay: Duration,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            amqp_url,
            queue,
            reconnect_delay,
            dispatcher,
        }
    }

    /// Run forever. The first connection attempt is fatal on failure so a
    /// misconfigured broker URL surfaces at startup; after that the
    /// consumer reconnects with a fixed delay whenever the connection or
    /// the delivery stream drops.
    pub async fn run(&self) -> Result<(), lapin::Error> {
        let mut connection = self.connect().await?;

        loop {
            match self.consume(&connection).await {
                Ok(()) => info!("delivery stream closed, reconnecting"),
                Err(err) => error!(error = %err, "amqp connection lost, reconnecting"),
            }

            tokio::time::sleep(self.reconnect_delay).await;
            connection = loop {
                match self.connect().await {
                    Ok(conn) => break conn,
                    Err(err) => {
                        error!(error = %err, "reconnect failed, retrying");
                        tokio::time::sleep(self.reconnect_delay).await;
                    }
                }
            };
        }
    }

    async fn connect(&self) -> Result<Connection, lapin::Error> {
        Connection::connect(&self.amqp_url, ConnectionProperties::default()).await
    }

    async fn consume(&self, connection: &Connection) -> Result<(), lapin::Error> {
        let channel = self.open_channel(connection).await?;
        let mut consumer = channel
            .basic_consume(
                &self.queue,
                CONSUMER_TAG,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        info!(queue = %self.queue, "waiting for article events");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery?;
            self.handle_delivery(delivery).await?;
        }

        Ok(())
    }

    async fn open_channel(&self, connection: &Connection) -> Result<Channel, lapin::Error> {
        let channel = connection.create_channel().await?;
        // One event in flight at a time; concurrency lives inside the
        // dispatch, not across events.
        channel.basic_qos(1, BasicQosOptions::default()).await?;
        channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(channel)
    }

    async fn handle_delivery(&self, delivery: Delivery) -> Result<(), lapin::Error> {
        let delivery_tag = delivery.delivery_tag;

        let event = match PublishedArticleEvent::decode(&delivery.data) {
            Ok(event) => event,
            Err(err) => {
                error!(delivery_tag, error = %err, "rejecting malformed event");
                return delivery
                    .reject(BasicRejectOptions { requeue: false })
                    .await;
            }
        };

        info!(
            delivery_tag,
            author_id = %event.author_id,
            article_id = %event.article_id,
            "event received"
        );

        match self.dispatcher.dispatch(&event).await {
            Ok(_summary) => delivery.ack(BasicAckOptions::default()).await,
            Err(err) => {
                error!(
                    delivery_tag,
                    author_id = %event.author_id,
                    article_id = %event.article_id,
                    error = %err,
                    "dispatch failed, returning event to the queue"
                );
                delivery
                    .nack(BasicNackOptions {
                        requeue: true,
                        ..BasicNackOptions::default()
                    })
                    .await
            }
        }
    }
}
