//! Wire types for one batch invocation from the external framework.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

/// One externally-triggered delivery of a bounded group of records. The
/// framework owns the batching policy; any size from one up to the
/// configured maximum arrives here.
#[derive(Debug, Deserialize)]
pub struct BatchInvocation {
    pub records: Vec<LogRecord>,
}

/// One record as delivered by the framework. `data` carries the serialized
/// event payload, base64-encoded in transit or already raw JSON text.
#[derive(Debug, Deserialize)]
pub struct LogRecord {
    pub data: String,
}

#[derive(thiserror::Error, Debug)]
#[error("record payload is base64 but not UTF-8 text")]
pub struct RecordDecodeError;

impl LogRecord {
    /// Recovers the UTF-8 JSON text of the payload.
    ///
    /// Base64 is tried first; a field that is not valid base64 is taken as
    /// raw text (raw JSON always contains characters outside the base64
    /// alphabet, so the two cannot be confused). Base64 that decodes to
    /// non-UTF-8 bytes is malformed and surfaced to the framework.
    pub fn payload_text(&self) -> Result<String, RecordDecodeError> {
        match BASE64.decode(&self.data) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| RecordDecodeError),
            Err(_) => Ok(self.data.clone()),
        }
    }
}
