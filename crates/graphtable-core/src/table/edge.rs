use crate::{
    entry::{Column, Entry},
    error::{ErrorOrigin, InternalError},
    id::{Direction, EDGE_ID_PARTS, EdgeId, Id, concat, splice_prefix, split},
    obs::sink::MutationKind,
    paginate::{EntryIter, EntryMeasure},
    query::{Condition, ConditionKey, Query, QuerySelector, RelationKind},
    table::{
        base::BaseTable,
        rows::{OrderedRows, RowMap, RowStore},
    },
    types::TableType,
};

///
/// EdgeTable
///
/// Edges live as columns of their owner vertex's row: the row id is part 0
/// of the spliced edge id and the column key is the rest. Pagination counts
/// edges (columns), not owner rows.
///

pub struct EdgeTable {
    base: BaseTable<OrderedRows>,
}

impl EdgeTable {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        let table_type = match direction {
            Direction::Out => TableType::EdgeOut,
            Direction::In => TableType::EdgeIn,
        };

        Self {
            base: BaseTable::new(table_type, EntryMeasure::Columns),
        }
    }

    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.base.table_type()
    }

    #[must_use]
    pub const fn base(&self) -> &BaseTable<OrderedRows> {
        &self.base
    }

    /// Merge the edge's columns into its owner row, creating the row on
    /// first edge.
    pub fn insert(&self, entry: &Entry) {
        let owner = owner_of(entry.id());
        self.base.upsert_row(&owner, entry);
        self.base.record_mutation(MutationKind::Insert, entry.id());
    }

    /// Remove the edge's columns from its owner row.
    pub fn delete(&self, entry: &Entry) {
        let owner = owner_of(entry.id());
        self.base.rows().update(&owner, |slot| {
            if let Some(row) = slot {
                row.remove_columns(entry);
                if row.is_empty() {
                    *slot = None;
                }
            }
        });
        self.base.record_mutation(MutationKind::Delete, entry.id());
    }

    /// Edge columns are replaced via delete + insert, never appended.
    pub fn append(&self, _entry: &Entry) -> Result<(), InternalError> {
        Err(InternalError::edge_unsupported("append"))
    }

    /// Edge columns are replaced via delete + insert, never eliminated.
    pub fn eliminate(&self, _entry: &Entry) -> Result<(), InternalError> {
        Err(InternalError::edge_unsupported("eliminate"))
    }

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
            QuerySelector::Conditions(conditions) => self.query_by_filter(conditions)?,
        };

        Ok(self.base.finish(rows, query))
    }

    /// Number of edges in a query's paginated result.
    pub fn count(&self, query: &Query) -> Result<u64, InternalError> {
        Ok(self
            .query(query)?
            .map(|entry| entry.column_count() as u64)
            .sum())
    }

    pub fn clear(&self) {
        self.base.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    // A bare owner id selects the whole row, a complete edge id selects one
    // column, and anything in between selects the columns under that prefix.
    fn query_by_id(&self, ids: &[Id]) -> Vec<Entry> {
        let mut result = RowMap::new();

        for id in ids {
            let parts = split(&id.as_string());
            let owner = Id::string(parts[0].as_str());
            let Some(row) = self.base.rows().get(&owner) else {
                continue;
            };

            match parts.len() {
                1 => result.merge(row),
                EDGE_ID_PARTS => {
                    let column = concat(&parts[1..]);
                    if let Some(value) = row.column(&column) {
                        result.merge(Entry::new(self.table_type(), owner).with_column(column, value));
                    }
                }
                _ => {
                    let prefix = splice_prefix(&parts[1..]);
                    if row.contains_prefix(&prefix) {
                        let columns = row.columns_with_prefix(&prefix, true, &prefix);
                        result.merge(self.edges_of(owner, columns));
                    }
                }
            }
        }

        result.into_vec()
    }

    fn query_by_id_prefix(&self, start: &Id, inclusive: bool, prefix: &Id) -> Vec<Entry> {
        let owner = owner_of(start);
        let Some(row) = self.base.rows().get(&owner) else {
            return Vec::new();
        };

        let columns = row.columns_with_prefix(&column_of(start), inclusive, &column_of(prefix));
        self.non_empty(self.edges_of(owner, columns))
    }

    fn query_by_id_range(
        &self,
        start: &Id,
        inclusive_start: bool,
        end: &Id,
        inclusive_end: bool,
    ) -> Vec<Entry> {
        let owner = owner_of(start);
        let Some(row) = self.base.rows().get(&owner) else {
            return Vec::new();
        };

        let columns = row.columns_with_range(
            &column_of(start),
            inclusive_start,
            &column_of(end),
            inclusive_end,
        );
        self.non_empty(self.edges_of(owner, columns))
    }

    // Only edge-label equality is answerable without a secondary index.
    fn query_by_filter(&self, conditions: &[Condition]) -> Result<Vec<Entry>, InternalError> {
        let label = match conditions {
            [] => return Ok(self.base.rows().scan(|_, row| Some(row.clone()))),
            [
                Condition {
                    key: ConditionKey::Label,
                    relation: RelationKind::Eq,
                    value,
                },
            ] => value.to_text(),
            _ => {
                let query = QuerySelector::Conditions(conditions.to_vec());
                tracing::warn!(table = %self.table_type(), %query, "rejected edge filter");
                return Err(InternalError::query_shape(
                    ErrorOrigin::Edge,
                    format!("not support querying edge by {query}"),
                ));
            }
        };

        let prefixes = [
            splice_prefix(&[Direction::Out.code(), label.as_str()]),
            splice_prefix(&[Direction::In.code(), label.as_str()]),
        ];

        Ok(self.base.rows().scan(|id, row| {
            let columns: Vec<_> = prefixes
                .iter()
                .filter(|prefix| row.contains_prefix(prefix))
                .flat_map(|prefix| row.columns_with_prefix(prefix, true, prefix))
                .collect();

            (!columns.is_empty()).then(|| self.edges_of(id.clone(), columns))
        }))
    }

    fn edges_of(&self, owner: Id, columns: impl IntoIterator<Item = Column>) -> Entry {
        Entry::with_columns(self.table_type(), owner, columns)
    }

    fn non_empty(&self, entry: Entry) -> Vec<Entry> {
        if entry.is_empty() {
            tracing::trace!(table = %self.table_type(), id = %entry.id(), "no edges matched");
            Vec::new()
        } else {
            vec![entry]
        }
    }
}

/// Build the entry that stores one edge under its column key.
#[must_use]
pub fn edge_entry(edge: &EdgeId, value: impl Into<String>) -> Entry {
    let table_type = match edge.direction {
        Direction::Out => TableType::EdgeOut,
        Direction::In => TableType::EdgeIn,
    };

    Entry::new(table_type, edge.to_id()).with_column(edge.column(), value)
}

// Part 0 of a spliced edge id is the owner vertex.
fn owner_of(id: &Id) -> Id {
    let owner = split(&id.as_string()).into_iter().next().unwrap_or_default();

    Id::string(owner)
}

// Column key of an edge id; empty for a bare owner id.
fn column_of(id: &Id) -> String {
    let parts = split(&id.as_string());

    concat(&parts[1..])
}
