//! Keeps the upstream's server-side filter rules in sync with the
//! configured search term.

use crate::api::{ApiError, FeedApi};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    AlreadyPresent,
    Created,
}

#[derive(thiserror::Error, Debug)]
pub enum RuleSyncError {
    /// The current rule state could not be read. Fatal for callers: opening
    /// a stream without knowing the rule state would tail the wrong filter.
    #[error("could not list filter rules: {0}")]
    Listing(#[source] ApiError),
}

/// Deterministic tag for a search term. Textual on purpose: the tag must be
/// stable across restarts so a later sync finds the rule an earlier one
/// created.
pub fn rule_tag(term: &str) -> String {
    format!("feed events matching {term}")
}

pub struct RuleSynchronizer {
    api: Arc<FeedApi>,
}

impl RuleSynchronizer {
    pub fn new(api: Arc<FeedApi>) -> Self {
        RuleSynchronizer { api }
    }

    /// Ensures exactly one rule tagged for `term` exists upstream.
    ///
    /// Check-then-create: one listing call, a local tag match, and at most
    /// one add call. Rule creation is best-effort on every process start; a
    /// failed add is logged and still reported as `Created`, leaving the
    /// stream to fall back to whatever rule state the upstream has.
    pub async fn ensure_rule(&self, term: &str) -> Result<RuleStatus, RuleSyncError> {
        let tag = rule_tag(term);
        let rules = self
            .api
            .list_rules()
            .await
            .map_err(RuleSyncError::Listing)?;

        if rules
            .iter()
            .any(|rule| rule.tag.as_deref() == Some(tag.as_str()))
        {
            return Ok(RuleStatus::AlreadyPresent);
        }

        if let Err(err) = self.api.add_rule(term, &tag).await {
            tracing::warn!(%tag, "rule creation failed, stream may be unfiltered: {err}");
        }

        Ok(RuleStatus::Created)
    }
}
