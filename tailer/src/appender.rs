//! Best-effort writes into the partitioned append-only log.

use crate::metrics_defs;
use crate::types::FeedEvent;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type RecordId = String;

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("log service transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("log service returned {0}")]
    Status(StatusCode),
}

/// Boundary to the external partitioned log: one write per record, ordered
/// within a partition key, at-least-once from the service's side.
#[async_trait]
pub trait RecordLog: Send + Sync {
    async fn append(
        &self,
        stream: &str,
        partition_key: &str,
        payload: Bytes,
    ) -> Result<RecordId, LogError>;
}

/// Sink the tailer hands decoded events to.
///
/// `submit` must return without waiting on write latency; the chunk loop
/// keeps reading while writes are in flight.
pub trait EventSink: Send + Sync {
    fn submit(&self, event: FeedEvent);
}

/// Single-shard deployment: one fixed key keeps every record on one ordered
/// partition. A multi-shard log needs a real keying scheme.
pub const PARTITION_KEY: &str = "pk-0";

/// Serializes events and dispatches one detached append per event.
///
/// Exactly one attempt per event: append errors are logged and the event is
/// dropped, with no retry and no dead-letter record.
pub struct LogAppender {
    log: Arc<dyn RecordLog>,
    stream: String,
}

impl LogAppender {
    pub fn new(log: Arc<dyn RecordLog>, stream: String) -> Self {
        LogAppender { log, stream }
    }
}

impl EventSink for LogAppender {
    fn submit(&self, event: FeedEvent) {
        let payload = match serde_json::to_vec(&event) {
            Ok(bytes) => Bytes::from(bytes),
            Err(err) => {
                tracing::error!(event_id = %event.id, "could not serialize event: {err}");
                return;
            }
        };

        let log = self.log.clone();
        let stream = self.stream.clone();

        // Fire and forget: the write task is detached and its outcome is
        // only inspected for logging.
        tokio::spawn(async move {
            match log.append(&stream, PARTITION_KEY, payload).await {
                Ok(record_id) => {
                    metrics::counter!(metrics_defs::RECORDS_APPENDED.name).increment(1);
                    tracing::debug!(%record_id, "event appended");
                }
                Err(err) => {
                    metrics::counter!(metrics_defs::APPEND_FAILURES.name).increment(1);
                    tracing::warn!("log append failed, dropping event: {err}");
                }
            }
        });
    }
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    partition_key: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct AppendResponse {
    record_id: RecordId,
}

/// `RecordLog` over the log service's HTTP API. Payloads travel base64
/// encoded inside a JSON body.
pub struct HttpRecordLog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordLog {
    pub fn new(base_url: &str) -> Self {
        HttpRecordLog {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RecordLog for HttpRecordLog {
    async fn append(
        &self,
        stream: &str,
        partition_key: &str,
        payload: Bytes,
    ) -> Result<RecordId, LogError> {
        let request = AppendRequest {
            partition_key,
            data: BASE64.encode(&payload),
        };

        let response = self
            .client
            .post(format!("{}/streams/{stream}/records", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LogError::Status(response.status()));
        }

        Ok(response.json::<AppendResponse>().await?.record_id)
    }
}
