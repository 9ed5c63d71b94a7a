//! Publishing to the pub/sub broker.

use async_trait::async_trait;
use reqwest::StatusCode;

/// At-most-once: the broker takes the message without any subscriber
/// acknowledgment.
pub const QOS_AT_MOST_ONCE: u8 = 0;

#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("broker transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("broker returned {0}")]
    Status(StatusCode),
}

/// Pub/sub broker boundary: one message to one topic per call.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: String, qos: u8) -> Result<(), PublishError>;
}

/// `TopicPublisher` over the broker's HTTP publish surface.
pub struct HttpTopicPublisher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTopicPublisher {
    pub fn new(base_url: &str) -> Self {
        HttpTopicPublisher {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TopicPublisher for HttpTopicPublisher {
    async fn publish(&self, topic: &str, payload: String, qos: u8) -> Result<(), PublishError> {
        let response = self
            .client
            .post(format!("{}/topics/{topic}", self.base_url))
            .query(&[("qos", qos.to_string())])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PublishError::Status(response.status()));
        }

        Ok(())
    }
}
