//! Client for the upstream streaming feed API.

use crate::types::FilterRule;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bearer credential is not a valid header value")]
    InvalidCredential,
    #[error("upstream returned {status} to {operation}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },
}

#[derive(Deserialize)]
struct RuleListing {
    // The upstream omits `data` entirely when no rules exist.
    #[serde(default)]
    data: Vec<FilterRule>,
}

/// Upstream feed API client: rule management plus the streaming endpoint.
///
/// Owns its `reqwest::Client`, configured once with the bearer credential
/// and passed by handle into the components that need it.
pub struct FeedApi {
    client: reqwest::Client,
    base_url: String,
}

impl FeedApi {
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {bearer_token}"))
            .map_err(|_| ApiError::InvalidCredential)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(FeedApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full current rule set.
    pub async fn list_rules(&self) -> Result<Vec<FilterRule>, ApiError> {
        let response = self
            .client
            .get(format!("{}/stream/rules", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                operation: "rule listing",
                status: response.status(),
            });
        }

        Ok(response.json::<RuleListing>().await?.data)
    }

    /// Adds one filter rule.
    pub async fn add_rule(&self, value: &str, tag: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "add": [{ "value": value, "tag": tag }] });
        let response = self
            .client
            .post(format!("{}/stream/rules", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                operation: "rule creation",
                status: response.status(),
            });
        }

        Ok(())
    }

    /// Opens the long-lived streaming request scoped to the established
    /// rule set. An error response here is fatal to the caller's run.
    pub async fn open_stream(&self) -> Result<EventStream, ApiError> {
        let response = self
            .client
            .get(format!("{}/stream", self.base_url))
            .query(&[("fields", "created_at")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                operation: "stream open",
                status: response.status(),
            });
        }

        Ok(EventStream { response })
    }
}

/// Lazily-read body of the streaming request. Unbounded and not restartable:
/// once it yields `Ok(None)` or an error, the connection is gone and a new
/// one must be opened by a fresh run.
pub struct EventStream {
    response: reqwest::Response,
}

impl EventStream {
    /// Next transport chunk, `Ok(None)` at upstream EOF.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, ApiError> {
        Ok(self.response.chunk().await?)
    }
}
