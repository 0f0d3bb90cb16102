// src/infrastructure/push/http.rs
use crate::application::ports::{PushError, PushGateway};
use crate::domain::notification::{NotificationMessage, SubscriberId, SubscriptionKey};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Push delivery over HTTP. Each attempt is bounded by its own timeouts so
/// a hung downstream cannot stall the dispatcher; the retry schedule lives
/// with the caller.
pub struct HttpPushGateway {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct PushRequestBody<'a> {
    subscriber_id: Uuid,
    message: &'a str,
}

impl HttpPushGateway {
    pub fn new(
        endpoint: impl Into<String>,
        total_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(total_timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(
        &self,
        subscriber_id: SubscriberId,
        key: &SubscriptionKey,
        message: &NotificationMessage,
    ) -> Result<(), PushError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.as_str())
            .json(&PushRequestBody {
                subscriber_id: subscriber_id.into(),
                message: message.as_str(),
            })
            .send()
            .await
            // Everything `send` can fail with is transport-class: connect
            // refused, timeout, broken connection.
            .map_err(|err| PushError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PushError::Rejected(status.as_u16()))
        }
    }
}
