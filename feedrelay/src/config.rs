//! Environment-style process configuration.
//!
//! Every required setting is validated up front so a misconfigured process
//! fails before its first remote call, naming the offending variable.

use shared::env::{EnvError, non_empty};

/// Settings for the tailer process.
#[derive(Debug)]
pub struct TailerConfig {
    pub feed_api_url: String,
    pub feed_api_token: String,
    pub log_api_url: String,
    pub log_stream_name: String,
    pub search_term: String,
}

impl TailerConfig {
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvError> {
        Ok(TailerConfig {
            feed_api_url: non_empty("FEED_API_URL", lookup("FEED_API_URL"))?,
            feed_api_token: non_empty("FEED_API_TOKEN", lookup("FEED_API_TOKEN"))?,
            log_api_url: non_empty("LOG_API_URL", lookup("LOG_API_URL"))?,
            log_stream_name: non_empty("LOG_STREAM_NAME", lookup("LOG_STREAM_NAME"))?,
            search_term: non_empty("SEARCH_TERM", lookup("SEARCH_TERM"))?,
        })
    }
}

/// Settings for one relay invocation.
#[derive(Debug)]
pub struct RelayConfig {
    pub broker_url: String,
    pub topic_name: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvError> {
        Ok(RelayConfig {
            broker_url: non_empty("BROKER_URL", lookup("BROKER_URL"))?,
            topic_name: non_empty("TOPIC_NAME", lookup("TOPIC_NAME"))?,
        })
    }
}
