use serde::{Deserialize, Serialize};

/// A server-side filter condition on the upstream feed.
///
/// The tag is the natural key: one rule per tag. This system creates rules
/// but never mutates or deletes them. Listings may omit `value`/`tag` for
/// rules created by other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One upstream event. Field names match the upstream wire form; the
/// serialized JSON of this struct is also the payload written to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub id: String,
    pub created_at: String,
    pub text: String,
}

/// Envelope the stream endpoint delivers, one per chunk.
#[derive(Debug, Deserialize)]
pub struct StreamEnvelope {
    pub data: FeedEvent,
    #[serde(default)]
    pub matching_rules: Vec<FilterRule>,
}

/// Decodes one complete envelope from a raw transport chunk.
pub fn decode_envelope(chunk: &[u8]) -> Result<StreamEnvelope, serde_json::Error> {
    serde_json::from_slice(chunk)
}
