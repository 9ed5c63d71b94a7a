use shared::metrics_defs::{MetricDef, MetricType};

pub const BATCHES_PUBLISHED: MetricDef = MetricDef {
    name: "relay.batches.published",
    metric_type: MetricType::Counter,
    description: "Invocations that published their aggregated message",
};

pub const RECORDS_RELAYED: MetricDef = MetricDef {
    name: "relay.records.relayed",
    metric_type: MetricType::Counter,
    description: "Log records carried inside published aggregates",
};

pub const ALL_METRICS: &[MetricDef] = &[BATCHES_PUBLISHED, RECORDS_RELAYED];
