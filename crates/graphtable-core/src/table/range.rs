use crate::{
    entry::Entry,
    error::{ErrorOrigin, InternalError},
    id::Id,
    index::{IndexLabelId, format_index_id},
    obs::sink::MutationKind,
    paginate::{EntryIter, EntryMeasure},
    query::{ConditionKey, Query, RangeConditions},
    table::{
        base::BaseTable,
        index::{index_label_of, label_to_delete, record_eviction},
        rows::SortedRows,
    },
    types::TableType,
    value::{FieldValue, NumericKind},
};
use std::cmp::Ordering;

///
/// RangeIndexTable
///
/// Numeric index over sorted composite ids. Each label owns one contiguous
/// key region, so bounded scans and label-wide deletes never leave it.
///

pub struct RangeIndexTable {
    base: BaseTable<SortedRows>,
    numeric_kind: NumericKind,
}

impl RangeIndexTable {
    /// Table of a fixed-kind range type.
    #[must_use]
    pub fn new(table_type: TableType) -> Self {
        debug_assert!(
            table_type.numeric_kind().is_some(),
            "{table_type} has no fixed numeric kind"
        );

        Self::with_kind(table_type, table_type.numeric_kind().unwrap_or_default())
    }

    /// Range table whose ids encode values as `numeric_kind`.
    #[must_use]
    pub(crate) fn with_kind(table_type: TableType, numeric_kind: NumericKind) -> Self {
        debug_assert!(table_type.is_range_index(), "{table_type} is not a range index");

        Self {
            base: BaseTable::new(table_type, EntryMeasure::Rows),
            numeric_kind,
        }
    }

    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.base.table_type()
    }

    #[must_use]
    pub const fn numeric_kind(&self) -> NumericKind {
        self.numeric_kind
    }

    #[must_use]
    pub const fn base(&self) -> &BaseTable<SortedRows> {
        &self.base
    }

    /// Composite id of `(label, value)` in this table; no value gives the
    /// label's lowest key.
    pub fn index_id(
        &self,
        label: IndexLabelId,
        value: Option<&FieldValue>,
    ) -> Result<Id, InternalError> {
        format_index_id(self.table_type(), label, value, Some(self.numeric_kind))
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

    /// Remove the whole key region of the entry's label.
    pub fn delete(&self, entry: &Entry) -> Result<(), InternalError> {
        let label = label_to_delete(entry)?;

        let min = self.index_id(label, None)?;
        let max = label
            .next()
            .map(|next| self.index_id(next, None))
            .transpose()?;
        let removed = self.base.rows().remove_range(&min, max.as_ref());

        self.base.record_mutation(MutationKind::Delete, entry.id());
        record_eviction(self.table_type(), label, removed);

        Ok(())
    }

    /// Answer an equality or a between query over one label.
    pub fn query(&self, query: &Query) -> Result<EntryIter, InternalError> {
        let conditions = query.conditions(ErrorOrigin::Index)?;
        if !(2..=3).contains(&conditions.len()) {
            return Err(InternalError::query_shape(
                ErrorOrigin::Index,
                format!(
                    "range index query must have two or three conditions, but got {}",
                    conditions.len()
                ),
            ));
        }

        let label = index_label_of(conditions)?;
        let relations: Vec<_> = conditions
            .iter()
            .filter(|c| c.key != ConditionKey::IndexLabelId)
            .collect();
        if let Some(other) = relations.iter().find(|c| c.key != ConditionKey::FieldValues) {
            return Err(InternalError::query_shape(
                ErrorOrigin::Index,
                format!("range index query can't filter by {other}"),
            ));
        }
        let range = RangeConditions::new(relations)?;

        let rows = match range.key_eq() {
            Some(value) if value.overflows(self.numeric_kind).is_some() => Vec::new(),
            Some(value) => {
                let id = self.index_id(label, Some(value))?;
                self.base.query_by_id(&[id])
            }
            None => self.between(label, &range)?,
        };

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

    // An absent lower bound starts at the kind's minimum, inclusive. An
    // absent upper bound stops before the next label's region. A bound
    // beyond the kind's range either opens its side or empties the scan.
    fn between(
        &self,
        label: IndexLabelId,
        range: &RangeConditions,
    ) -> Result<Vec<Entry>, InternalError> {
        if range.key_min().is_none() && range.key_max().is_none() {
            return Err(InternalError::index_empty_range());
        }
        let rows = self.base.rows();
        let kind = self.numeric_kind;

        let key_min = match range.key_min().map(|v| (v, v.overflows(kind))) {
            Some((_, Some(Ordering::Greater))) => return Ok(Vec::new()),
            Some((value, None)) => Some(value),
            _ => None,
        };
        let key_max = match range.key_max().map(|v| (v, v.overflows(kind))) {
            Some((_, Some(Ordering::Less))) => return Ok(Vec::new()),
            Some((value, None)) => Some(value),
            _ => None,
        };

        let min_inclusive = key_min.is_none() || range.key_min_eq();
        let min = match key_min {
            Some(value) => self.index_id(label, Some(value))?,
            None => self.index_id(label, Some(&kind.min_value()))?,
        };

        let ceiling = match key_max {
            Some(value) => {
                let max = self.index_id(label, Some(value))?;
                if range.key_max_eq() {
                    rows.floor_key(&max)
                } else {
                    rows.lower_key(&max)
                }
            }
            None => match label.next() {
                Some(next) => rows.lower_key(&self.index_id(next, None)?),
                None => rows.last_key(),
            },
        };
        let Some(ceiling) = ceiling else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        let mut cursor = if min_inclusive {
            rows.ceiling_entry(&min)
        } else {
            rows.higher_entry(&min)
        };
        while let Some((id, entry)) = cursor {
            if id > ceiling {
                break;
            }
            results.push(entry);
            cursor = rows.higher_entry(&id);
        }

        tracing::trace!(
            table = %self.table_type(),
            %label,
            rows = results.len(),
            "range scanned"
        );

        Ok(results)
    }
}

///
/// TESTS
///
