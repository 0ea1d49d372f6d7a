//! Metrics sink boundary.
//!
//! Table logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::{obs::metrics, types::TableType};
use std::{cell::RefCell, sync::Arc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MutationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MutationKind {
    Insert,
    Delete,
    Append,
    Eliminate,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Mutation {
        table: TableType,
        kind: MutationKind,
    },
    Query {
        table: TableType,
        selector: &'static str,
        rows_resolved: u64,
    },
    Eviction {
        table: TableType,
        removed: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into the global counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Mutation { table, kind } => {
                metrics::with_state_mut(|m| {
                    let ops = &mut m.ops;
                    let counter = match kind {
                        MutationKind::Insert => &mut ops.inserts,
                        MutationKind::Delete => &mut ops.deletes,
                        MutationKind::Append => &mut ops.appends,
                        MutationKind::Eliminate => &mut ops.eliminates,
                    };
                    *counter = counter.saturating_add(1);

                    let entry = m.table_mut(table.as_str());
                    entry.mutations = entry.mutations.saturating_add(1);
                });
            }

            MetricsEvent::Query {
                table,
                rows_resolved,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.queries = m.ops.queries.saturating_add(1);
                    m.ops.rows_resolved = m.ops.rows_resolved.saturating_add(rows_resolved);

                    let entry = m.table_mut(table.as_str());
                    entry.queries = entry.queries.saturating_add(1);
                    entry.rows_resolved = entry.rows_resolved.saturating_add(rows_resolved);
                });
            }

            MetricsEvent::Eviction { table, removed } => {
                metrics::with_state_mut(|m| {
                    m.ops.evictions = m.ops.evictions.saturating_add(1);
                    m.ops.rows_evicted = m.ops.rows_evicted.saturating_add(removed);

                    let entry = m.table_mut(table.as_str());
                    entry.rows_evicted = entry.rows_evicted.saturating_add(removed);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current global counters.
#[must_use]
pub fn metrics_report() -> metrics::EventState {
    metrics::with_state(Clone::clone)
}

/// Reset all global counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[derive(Default)]
    struct CapturingSink {
        events: Mutex<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CapturingSink {
        fn record(&self, event: MetricsEvent) {
            self.events.lock().push(event);
        }
    }

    const INSERT: MetricsEvent = MetricsEvent::Mutation {
        table: TableType::Vertex,
        kind: MutationKind::Insert,
    };

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        let outer = Arc::new(CapturingSink::default());
        let inner = Arc::new(CapturingSink::default());

        with_metrics_sink(outer.clone(), || {
            record(INSERT);
            with_metrics_sink(inner.clone(), || record(INSERT));
            record(INSERT);
        });

        assert_eq!(outer.events.lock().len(), 2);
        assert_eq!(inner.events.lock().len(), 1);
        assert!(SINK_OVERRIDE.with(|cell| cell.borrow().is_none()));
    }

    #[test]
    fn with_metrics_sink_restores_after_panic() {
        let sink = Arc::new(CapturingSink::default());

        let result = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || panic!("boom"));
        }));

        assert!(result.is_err());
        assert!(SINK_OVERRIDE.with(|cell| cell.borrow().is_none()));
    }
}
