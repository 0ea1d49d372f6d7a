use crate::{
    entry::Entry,
    error::InternalError,
    id::Id,
    obs::sink::{self, MetricsEvent, MutationKind},
    paginate::{EntryIter, EntryMeasure, paginate},
    query::{Condition, Query, QuerySelector},
    table::rows::{OrderedRows, RowStore},
    types::TableType,
};
use std::{collections::HashSet, ops::Bound};

///
/// BaseTable
///
/// Generic id → entry table: upsert/merge mutations, the four default row
/// resolvers and measured pagination. Specialized tables compose one and
/// override resolution or deletion where their id layout demands it.
///

pub struct BaseTable<S = OrderedRows> {
    table_type: TableType,
    measure: EntryMeasure,
    rows: S,
}

impl<S: RowStore> BaseTable<S> {
    #[must_use]
    pub fn new(table_type: TableType, measure: EntryMeasure) -> Self {
        Self {
            table_type,
            measure,
            rows: S::default(),
        }
    }

    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.table_type
    }

    #[must_use]
    pub const fn measure(&self) -> EntryMeasure {
        self.measure
    }

    #[must_use]
    pub const fn rows(&self) -> &S {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&self) {
        self.rows.clear();
        tracing::debug!(table = %self.table_type, "table cleared");
    }

    /// Store the entry, or merge its columns into the stored row.
    pub fn insert(&self, entry: &Entry) {
        self.upsert_row(entry.id(), entry);
        self.record_mutation(MutationKind::Insert, entry.id());
    }

    /// Remove the listed columns from the stored row. An entry without
    /// columns removes the whole row, and so does removing its last column.
    pub fn delete(&self, entry: &Entry) {
        self.remove_row_columns(entry.id(), entry);
        self.record_mutation(MutationKind::Delete, entry.id());
    }

    /// Store the entry, or append its columns to the stored row.
    pub fn append(&self, entry: &Entry) {
        self.rows.update(entry.id(), |slot| match slot {
            Some(row) => row.append(entry),
            None => *slot = Some(entry.clone()),
        });
        self.record_mutation(MutationKind::Append, entry.id());
    }

    /// Eliminate the listed columns (or array elements) from the stored row.
    pub fn eliminate(&self, entry: &Entry) {
        self.rows.update(entry.id(), |slot| {
            if let Some(row) = slot {
                row.eliminate(entry);
            }
        });
        self.record_mutation(MutationKind::Eliminate, entry.id());
    }

    /// Resolve rows with the default resolvers, then paginate.
    pub fn query(&self, query: &Query) -> Result<EntryIter, InternalError> {
        let rows = match query.selector() {
            QuerySelector::Ids(ids) => self.query_by_id(ids),
            QuerySelector::IdPrefix {
                start,
                inclusive_start,
                prefix,
            } => self.query_by_id_prefix(start, *inclusive_start, prefix),
            QuerySelector::IdRange {
                start,
                inclusive_start,
                end,
                inclusive_end,
            } => self.query_by_id_range(start, *inclusive_start, end, *inclusive_end),
            QuerySelector::Conditions(conditions) => self.query_by_filter(conditions),
        };

        Ok(self.finish(rows, query))
    }

    /// Measured size of a query's paginated result.
    pub fn count(&self, query: &Query) -> Result<u64, InternalError> {
        Ok(self
            .query(query)?
            .map(|entry| self.measure.size_of(&entry))
            .sum())
    }

    /// Paginate resolved rows using this table's measure.
    pub(crate) fn finish(&self, rows: Vec<Entry>, query: &Query) -> EntryIter {
        sink::record(MetricsEvent::Query {
            table: self.table_type,
            selector: query.selector().kind(),
            rows_resolved: rows.len() as u64,
        });
        tracing::trace!(
            table = %self.table_type,
            selector = query.selector().kind(),
            rows = rows.len(),
            offset = query.offset_value(),
            limit = ?query.limit_value(),
            "query resolved"
        );

        paginate(
            Box::new(rows.into_iter()),
            query.offset_value(),
            query.limit_value(),
            self.measure,
        )
    }

    /// Exact lookup of each requested id; repeated ids resolve once.
    pub(crate) fn query_by_id(&self, ids: &[Id]) -> Vec<Entry> {
        let mut seen = HashSet::new();

        ids.iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.rows.get(id))
            .collect()
    }

    /// Rows at or after `start` whose id starts with `prefix`.
    pub(crate) fn query_by_id_prefix(&self, start: &Id, inclusive: bool, prefix: &Id) -> Vec<Entry> {
        self.rows.scan(|id, entry| {
            let after_start = if inclusive { id >= start } else { id > start };
            (after_start && id.starts_with(prefix.as_bytes())).then(|| entry.clone())
        })
    }

    /// Rows whose id falls between `start` and `end`.
    pub(crate) fn query_by_id_range(
        &self,
        start: &Id,
        inclusive_start: bool,
        end: &Id,
        inclusive_end: bool,
    ) -> Vec<Entry> {
        let lower = if inclusive_start {
            Bound::Included(start)
        } else {
            Bound::Excluded(start)
        };
        let upper = if inclusive_end {
            Bound::Included(end)
        } else {
            Bound::Excluded(end)
        };

        self.rows.scan(|id, entry| {
            std::ops::RangeBounds::contains(&(lower, upper), id).then(|| entry.clone())
        })
    }

    /// Rows satisfying every condition; no conditions selects every row.
    pub(crate) fn query_by_filter(&self, conditions: &[Condition]) -> Vec<Entry> {
        self.rows.scan(|_, entry| {
            conditions
                .iter()
                .all(|c| c.test(entry))
                .then(|| entry.clone())
        })
    }

    /// Merge `entry`'s columns into the row stored under `row_id`.
    pub(crate) fn upsert_row(&self, row_id: &Id, entry: &Entry) {
        self.rows.update(row_id, |slot| match slot {
            Some(row) => row.merge(entry),
            None => {
                let mut row = Entry::new(self.table_type, row_id.clone());
                row.merge(entry);
                *slot = Some(row);
            }
        });
    }

    /// Drop `entry`'s columns from the row stored under `row_id`.
    pub(crate) fn remove_row_columns(&self, row_id: &Id, entry: &Entry) {
        self.rows.update(row_id, |slot| {
            if let Some(row) = slot {
                row.remove_columns(entry);
                if entry.is_empty() || row.is_empty() {
                    *slot = None;
                }
            }
        });
    }

    pub(crate) fn record_mutation(&self, kind: MutationKind, id: &Id) {
        sink::record(MetricsEvent::Mutation {
            table: self.table_type,
            kind,
        });
        tracing::trace!(table = %self.table_type, %id, ?kind, "row mutated");
    }
}

///
/// TESTS
///
