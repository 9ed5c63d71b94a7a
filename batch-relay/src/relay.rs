//! The relay handler: one invocation in, one aggregated publish out.

use crate::errors::RelayError;
use crate::metrics_defs;
use crate::protocol::BatchInvocation;
use crate::publisher::{QOS_AT_MOST_ONCE, TopicPublisher};
use std::sync::Arc;

/// Builds one JSON array around pre-serialized payload fragments.
///
/// Pure string framing: the fragments were produced by the appender and are
/// known well-formed, so there is no parse/reserialize round trip.
pub fn frame_batch(payloads: &[String]) -> String {
    format!("[{}]", payloads.join(","))
}

/// Republishes each pushed batch as a single aggregated message.
///
/// Holds no mutable state; the framework may run any number of instances
/// concurrently.
pub struct BatchRelay {
    publisher: Arc<dyn TopicPublisher>,
    topic: String,
}

impl BatchRelay {
    pub fn new(publisher: Arc<dyn TopicPublisher>, topic: String) -> Self {
        BatchRelay { publisher, topic }
    }

    /// Handles one invocation: decode every record's payload, frame them in
    /// delivery order, publish exactly once at QoS 0.
    pub async fn handle(&self, batch: BatchInvocation) -> Result<(), RelayError> {
        // The framework contract says at least one record; tolerate an
        // empty push anyway rather than waking subscribers with `[]`.
        if batch.records.is_empty() {
            tracing::debug!("empty invocation, nothing to publish");
            return Ok(());
        }

        let payloads = batch
            .records
            .iter()
            .map(|record| record.payload_text())
            .collect::<Result<Vec<_>, _>>()?;

        let record_count = payloads.len();
        let message = frame_batch(&payloads);

        self.publisher
            .publish(&self.topic, message, QOS_AT_MOST_ONCE)
            .await?;

        metrics::counter!(metrics_defs::BATCHES_PUBLISHED.name).increment(1);
        metrics::counter!(metrics_defs::RECORDS_RELAYED.name).increment(record_count as u64);
        tracing::info!(topic = %self.topic, record_count, "published aggregated batch");

        Ok(())
    }
}
