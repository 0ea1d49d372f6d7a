use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// EventState
/// Ephemeral, in-memory counters for table operations.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub tables: BTreeMap<String, TableCounters>,
}

impl EventState {
    const fn new() -> Self {
        Self {
            ops: EventOps::new(),
            tables: BTreeMap::new(),
        }
    }

    pub(crate) fn table_mut(&mut self, table: &str) -> &mut TableCounters {
        self.tables.entry(table.to_string()).or_default()
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Mutation entrypoints
    pub inserts: u64,
    pub deletes: u64,
    pub appends: u64,
    pub eliminates: u64,

    // Queries
    pub queries: u64,
    pub rows_resolved: u64,

    // Bulk label eviction
    pub evictions: u64,
    pub rows_evicted: u64,
}

impl EventOps {
    const fn new() -> Self {
        Self {
            inserts: 0,
            deletes: 0,
            appends: 0,
            eliminates: 0,
            queries: 0,
            rows_resolved: 0,
            evictions: 0,
            rows_evicted: 0,
        }
    }
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub mutations: u64,
    pub queries: u64,
    pub rows_resolved: u64,
    pub rows_evicted: u64,
}

static EVENT_STATE: Mutex<EventState> = Mutex::new(EventState::new());

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    f(&EVENT_STATE.lock())
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    f(&mut EVENT_STATE.lock())
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::new());
}
