//! Metric definitions emitted through the `metrics` facade.
//! The embedding application decides where they are exported.

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

pub const DISPATCHES: MetricDef = MetricDef {
    name: "dispatch.completed",
    metric_type: MetricType::Counter,
    description: "Requests resolved to a plant and dispatched",
};

pub const DISPATCH_NOOPS: MetricDef = MetricDef {
    name: "dispatch.noop",
    metric_type: MetricType::Counter,
    description: "Requests absorbed without a response (absent, malformed, or unroutable)",
};

pub const HOUSEKEEPING_RUNS: MetricDef = MetricDef {
    name: "housekeeping.runs",
    metric_type: MetricType::Counter,
    description: "Housekeeping tasks scheduled by the background trigger",
};

pub const ALL_METRICS: &[MetricDef] = &[DISPATCHES, DISPATCH_NOOPS, HOUSEKEEPING_RUNS];
