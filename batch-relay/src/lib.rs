//! Republishes batches of log records as one aggregated pub/sub message.
//!
//! The external invocation framework pushes each bounded batch exactly once
//! per invocation; this crate decodes the record payloads, frames them into
//! a single JSON array without re-parsing, and publishes once at QoS 0.
//! Failures are returned to the framework, which owns redelivery.

pub mod errors;
pub mod metrics_defs;
pub mod protocol;
pub mod publisher;
pub mod relay;
