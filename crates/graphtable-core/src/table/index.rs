use crate::{
    entry::Entry,
    error::{ErrorOrigin, InternalError},
    index::{INDEX_LABEL_COLUMN, IndexLabelId, format_index_id, string_label_prefix},
    obs::sink::{self, MetricsEvent, MutationKind},
    paginate::{EntryIter, EntryMeasure},
    query::{Condition, ConditionKey, Query, RelationKind},
    table::{
        base::BaseTable,
        rows::{OrderedRows, RowStore},
    },
    types::TableType,
    value::FieldValue,
};

///
/// SecondaryIndexTable
///
/// Exact-match index keyed by `label > value`. Search and unique indexes
/// share the layout and differ only in their type tag.
///

pub struct SecondaryIndexTable {
    base: BaseTable<OrderedRows>,
}

impl SecondaryIndexTable {
    #[must_use]
    pub fn new(table_type: TableType) -> Self {
        debug_assert!(table_type.is_string_index(), "{table_type} is not a string index");

        Self {
            base: BaseTable::new(table_type, EntryMeasure::Rows),
        }
    }

    #[must_use]
    pub fn secondary() -> Self {
        Self::new(TableType::SecondaryIndex)
    }

    #[must_use]
    pub fn search() -> Self {
        Self::new(TableType::SearchIndex)
    }

    #[must_use]
    pub fn unique() -> Self {
        Self::new(TableType::UniqueIndex)
    }

    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.base.table_type()
    }

    #[must_use]
    pub const fn base(&self) -> &BaseTable<OrderedRows> {
        &self.base
    }

    pub fn insert(&self, entry: &Entry) {
        self.base.insert(entry);
    }

    pub fn append(&self, entry: &Entry) {
        self.base.append(entry);
    }

    pub fn eliminate(&self, entry: &Entry) {
        self.base.eliminate(entry);
    }

    /// Evict every index row of the entry's label.
    ///
    /// Rows are keyed by spliced text, so one label's rows are not
    /// contiguous under insertion order and the whole table is scanned.
    pub fn delete(&self, entry: &Entry) -> Result<(), InternalError> {
        let label = label_to_delete(entry)?;
        let prefix = string_label_prefix(label);

        let removed = self
            .base
            .rows()
            .retain(|id, _| !id.starts_with(prefix.as_bytes()));

        self.base.record_mutation(MutationKind::Delete, entry.id());
        record_eviction(self.table_type(), label, removed);

        Ok(())
    }

    /// Look up the single row of a `(field value, index label)` pair.
    pub fn query(&self, query: &Query) -> Result<EntryIter, InternalError> {
        let conditions = query.conditions(ErrorOrigin::Index)?;
        if conditions.len() != 2 {
            return Err(InternalError::query_shape(
                ErrorOrigin::Index,
                format!(
                    "secondary index query must have two conditions, but got {}",
                    conditions.len()
                ),
            ));
        }

        let label = index_label_of(conditions)?;
        let value = conditions
            .iter()
            .find(|c| c.key == ConditionKey::FieldValues && c.relation == RelationKind::Eq)
            .map(|c| &c.value)
            .ok_or_else(|| {
                InternalError::query_shape(
                    ErrorOrigin::Index,
                    "secondary index query must have a field values equality",
                )
            })?;

        let id = format_index_id(self.table_type(), label, Some(value), None)?;
        let rows = self.base.query_by_id(&[id]);

        Ok(self.base.finish(rows, query))
    }

    pub fn count(&self, query: &Query) -> Result<u64, InternalError> {
        Ok(self.query(query)?.count() as u64)
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
}

/// Label of the single `IndexLabelId` equality among the conditions.
pub(crate) fn index_label_of(conditions: &[Condition]) -> Result<IndexLabelId, InternalError> {
    let mut labels = conditions
        .iter()
        .filter(|c| c.key == ConditionKey::IndexLabelId);

    match (labels.next(), labels.next()) {
        (Some(c), None) if c.relation == RelationKind::Eq => c.value.as_index_label(),
        (Some(c), None) => Err(InternalError::query_shape(
            ErrorOrigin::Index,
            format!("index label id must be an equality, but got {c}"),
        )),
        (None, _) => Err(InternalError::query_shape(
            ErrorOrigin::Index,
            "index query must have an index label id condition",
        )),
        (Some(_), Some(_)) => Err(InternalError::query_shape(
            ErrorOrigin::Index,
            "index query must have exactly one index label id condition",
        )),
    }
}

/// Label named by a label-wide delete entry, which carries nothing else.
pub(crate) fn label_to_delete(entry: &Entry) -> Result<IndexLabelId, InternalError> {
    match entry.column(INDEX_LABEL_COLUMN) {
        Some(label) if entry.column_count() == 1 => FieldValue::from(label).as_index_label(),
        _ => Err(InternalError::index_missing_column(
            INDEX_LABEL_COLUMN,
            usize::from(entry.contains(INDEX_LABEL_COLUMN)),
        )),
    }
}

pub(crate) fn record_eviction(table: TableType, label: IndexLabelId, removed: usize) {
    sink::record(MetricsEvent::Eviction {
        table,
        removed: removed as u64,
    });
    tracing::debug!(%table, %label, removed, "index label evicted");
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorClass, id::Id};

    fn index_row(table: TableType, label: u32, value: &str, element: &str) -> Entry {
        let id = format_index_id(table, IndexLabelId::new(label), Some(&value.into()), None)
            .expect("string index id");

        Entry::new(table, id).with_column(element, "")
    }

    fn lookup(label: i64, value: &str) -> Query {
        Query::by_conditions(
            TableType::SecondaryIndex,
            [
                Condition::equals(ConditionKey::FieldValues, value),
                Condition::equals(ConditionKey::IndexLabelId, label),
            ],
        )
    }

    fn seeded() -> SecondaryIndexTable {
        let table = SecondaryIndexTable::secondary();
        table.insert(&index_row(TableType::SecondaryIndex, 1, "marko", "v1"));
        table.insert(&index_row(TableType::SecondaryIndex, 1, "marko", "v7"));
        table.insert(&index_row(TableType::SecondaryIndex, 1, "josh", "v2"));
        table.insert(&index_row(TableType::SecondaryIndex, 10, "marko", "v3"));
        table
    }

    #[test]
    fn equality_query_returns_the_formatted_row() {
        let table = seeded();
        let rows: Vec<Entry> = table.query(&lookup(1, "marko")).expect("query").collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id(), &Id::string("1>marko"));
        assert_eq!(rows[0].column_keys().collect::<Vec<_>>(), vec!["v1", "v7"]);
        assert_eq!(table.count(&lookup(1, "peter")).expect("count"), 0);
    }

    #[test]
    fn query_requires_exactly_two_conditions() {
        let table = seeded();
        let one = Query::by_conditions(
            TableType::SecondaryIndex,
            [Condition::equals(ConditionKey::IndexLabelId, 1)],
        );
        let by_id = Query::by_ids(TableType::SecondaryIndex, [Id::string("1>marko")]);
        let no_label = Query::by_conditions(
            TableType::SecondaryIndex,
            [
                Condition::equals(ConditionKey::FieldValues, "marko"),
                Condition::equals(ConditionKey::Label, "person"),
            ],
        );

        for query in [one, by_id, no_label] {
            let err = table.query(&query).err().expect("shape error");
            assert_eq!(err.class, ErrorClass::InvalidQueryShape, "{query:?}");
        }
    }

    #[test]
    fn delete_evicts_only_the_named_label() {
        let table = seeded();
        let delete = Entry::new(TableType::SecondaryIndex, Id::string("1"))
            .with_column(INDEX_LABEL_COLUMN, "1");

        table.delete(&delete).expect("delete");

        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&lookup(10, "marko")).expect("count"), 1);
        assert_eq!(table.count(&lookup(1, "josh")).expect("count"), 0);
    }

    #[test]
    fn delete_requires_a_lone_label_column() {
        let table = seeded();
        let missing = Entry::new(TableType::SecondaryIndex, Id::string("1")).with_column("x", "1");
        let extra = missing.clone().with_column(INDEX_LABEL_COLUMN, "1");

        for entry in [missing, extra] {
            let err = table.delete(&entry).expect_err("missing label column");
            assert_eq!(err.class, ErrorClass::MissingRequiredColumn);
        }
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn search_and_unique_share_the_layout() {
        let table = SecondaryIndexTable::unique();
        table.insert(&index_row(TableType::UniqueIndex, 4, "a@b.c", "v9"));
        let query = Query::by_conditions(
            TableType::UniqueIndex,
            [
                Condition::equals(ConditionKey::IndexLabelId, 4),
                Condition::equals(ConditionKey::FieldValues, "a@b.c"),
            ],
        );

        assert_eq!(table.count(&query).expect("count"), 1);
        assert_eq!(SecondaryIndexTable::search().table_type(), TableType::SearchIndex);
    }
}
