use crate::protocol::RecordDecodeError;
use crate::publisher::PublishError;
use thiserror::Error;

/// Failures of one relay invocation. Unlike the tailer's per-record drops,
/// every error here goes back to the invoking framework so its redelivery
/// policy applies.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("malformed record in batch: {0}")]
    MalformedRecord(#[from] RecordDecodeError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}
