//! Observability: in-process table counters and the sink boundary.
//!
//! Tables never touch the counters directly; every event flows through
//! [`sink::record`].

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventState, TableCounters};
pub use sink::{
    MetricsEvent, MetricsSink, MutationKind, metrics_report, metrics_reset_all, with_metrics_sink,
};
