//! Types for declaring the metrics a crate emits.
//!
//! Each service crate keeps a `metrics_defs.rs` with a constant table of the
//! metrics it publishes; call sites reference the constant's `name` via the
//! `metrics` facade macros.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}
