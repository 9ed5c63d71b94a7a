use shared::metrics_defs::{MetricDef, MetricType};

pub const EVENTS_DECODED: MetricDef = MetricDef {
    name: "tailer.events.decoded",
    metric_type: MetricType::Counter,
    description: "Chunks decoded into events and submitted for append",
};

pub const DECODE_FAILURES: MetricDef = MetricDef {
    name: "tailer.chunks.decode_failures",
    metric_type: MetricType::Counter,
    description: "Chunks dropped because they did not decode as one envelope",
};

pub const RECORDS_APPENDED: MetricDef = MetricDef {
    name: "tailer.records.appended",
    metric_type: MetricType::Counter,
    description: "Events successfully appended to the log",
};

pub const APPEND_FAILURES: MetricDef = MetricDef {
    name: "tailer.records.append_failures",
    metric_type: MetricType::Counter,
    description: "Events dropped because their single append attempt failed",
};

pub const ALL_METRICS: &[MetricDef] = &[
    EVENTS_DECODED,
    DECODE_FAILURES,
    RECORDS_APPENDED,
    APPEND_FAILURES,
];
