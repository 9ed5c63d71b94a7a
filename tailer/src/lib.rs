//! Tails a filtered upstream event stream into a partitioned append-only log.
//!
//! The tailer runs as a single long-lived task: it synchronizes the upstream
//! filter rule once at startup, opens one streaming connection, and forwards
//! every decoded event to the log with fire-and-forget writes. Connection
//! loss is terminal for the run; per-record failures are not.

pub mod api;
pub mod appender;
pub mod metrics_defs;
pub mod rules;
pub mod tailer;
pub mod types;

#[cfg(test)]
pub(crate) mod testutils;
