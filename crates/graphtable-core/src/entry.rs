//! Row model shared by every table: an id plus key-ordered text columns.

use crate::{id::Id, types::TableType};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::{collections::BTreeMap, ops::Bound};

///
/// Column
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub value: String,
}

impl Column {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

///
/// Entry
///
/// One row keyed by an id. Column keys are unique and iterate in key
/// order, so head/tail copies and pagination splits are deterministic.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entry {
    table_type: TableType,
    id: Id,
    columns: BTreeMap<String, String>,
}

impl Entry {
    #[must_use]
    pub const fn new(table_type: TableType, id: Id) -> Self {
        Self {
            table_type,
            id,
            columns: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_columns(
        table_type: TableType,
        id: Id,
        columns: impl IntoIterator<Item = Column>,
    ) -> Self {
        let mut entry = Self::new(table_type, id);
        entry.set_columns(columns);

        entry
    }

    /// Builder form of [`Entry::insert_column`].
    #[must_use]
    pub fn with_column(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_column(key, value);
        self
    }

    #[must_use]
    pub const fn table_type(&self) -> TableType {
        self.table_type
    }

    #[must_use]
    pub const fn id(&self) -> &Id {
        &self.id
    }

    #[must_use]
    pub fn column(&self, key: &str) -> Option<&str> {
        self.columns.get(key).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn insert_column(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.columns.insert(key.into(), value.into());
    }

    pub fn set_columns(&mut self, columns: impl IntoIterator<Item = Column>) {
        self.columns
            .extend(columns.into_iter().map(|c| (c.key, c.value)));
    }

    /// Union the other entry's columns into this one; same keys take the
    /// other entry's value.
    pub fn merge(&mut self, other: &Self) {
        self.columns.extend(
            other
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    /// Drop every column whose key the other entry lists.
    pub fn remove_columns(&mut self, other: &Self) {
        for key in other.columns.keys() {
            self.columns.remove(key);
        }
    }

    /// Add columns, unioning JSON-array values that exist on both sides.
    ///
    /// Scalar values overwrite; array elements keep their first position
    /// and are never duplicated.
    pub fn append(&mut self, other: &Self) {
        for (key, value) in &other.columns {
            let merged = match self.columns.get(key) {
                Some(old) => match (parse_json_array(old), parse_json_array(value)) {
                    (Some(mut old_items), Some(new_items)) => {
                        for item in new_items {
                            if !old_items.contains(&item) {
                                old_items.push(item);
                            }
                        }
                        JsonValue::Array(old_items).to_string()
                    }
                    _ => value.clone(),
                },
                None => value.clone(),
            };
            self.columns.insert(key.clone(), merged);
        }
    }

    /// Remove columns, or only the listed elements of JSON-array columns.
    pub fn eliminate(&mut self, other: &Self) {
        for (key, value) in &other.columns {
            let remaining = match (self.columns.get(key), parse_json_array(value)) {
                (Some(old), Some(removed)) => parse_json_array(old).map(|items| {
                    let kept: Vec<JsonValue> =
                        items.into_iter().filter(|v| !removed.contains(v)).collect();
                    JsonValue::Array(kept).to_string()
                }),
                _ => None,
            };
            match remaining {
                Some(kept) => {
                    self.columns.insert(key.clone(), kept);
                }
                None => {
                    self.columns.remove(key);
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    #[must_use]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.columns
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    /// Columns at or after `start` whose key starts with `prefix`.
    #[must_use]
    pub fn columns_with_prefix(&self, start: &str, inclusive: bool, prefix: &str) -> Vec<Column> {
        let lower = if inclusive {
            Bound::Included(start)
        } else {
            Bound::Excluded(start)
        };

        self.columns
            .range::<str, _>((lower, Bound::Unbounded))
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| Column::new(k.clone(), v.clone()))
            .collect()
    }

    /// Columns with keys between `start` and `end`, each bound independently
    /// inclusive or exclusive.
    #[must_use]
    pub fn columns_with_range(
        &self,
        start: &str,
        inclusive_start: bool,
        end: &str,
        inclusive_end: bool,
    ) -> Vec<Column> {
        // BTreeMap::range panics on inverted or empty-exclusive bounds.
        if start > end || (start == end && !(inclusive_start && inclusive_end)) {
            return Vec::new();
        }
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

        self.columns
            .range::<str, _>((lower, upper))
            .map(|(k, v)| Column::new(k.clone(), v.clone()))
            .collect()
    }

    /// Copy of this entry keeping only the first `count` columns.
    #[must_use]
    pub fn copy_head(&self, count: usize) -> Self {
        Self {
            table_type: self.table_type,
            id: self.id.clone(),
            columns: self
                .columns
                .iter()
                .take(count)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Copy of this entry keeping only the last `count` columns.
    #[must_use]
    pub fn copy_last(&self, count: usize) -> Self {
        let skip = self.columns.len().saturating_sub(count);

        Self {
            table_type: self.table_type,
            id: self.id.clone(),
            columns: self
                .columns
                .iter()
                .skip(skip)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

fn parse_json_array(raw: &str) -> Option<Vec<JsonValue>> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Array(items)) => Some(items),
        _ => None,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn row(columns: &[(&str, &str)]) -> Entry {
        columns
            .iter()
            .fold(Entry::new(TableType::Vertex, Id::string("v1")), |e, (k, v)| {
                e.with_column(*k, *v)
            })
    }

    fn keys(entry: &Entry) -> Vec<&str> {
        entry.column_keys().collect()
    }

    #[test]
    fn merge_is_last_write_wins_and_idempotent() {
        let mut stored = row(&[("a", "1"), ("b", "2")]);
        let update = row(&[("b", "3"), ("c", "4")]);

        stored.merge(&update);
        let once = stored.clone();
        stored.merge(&update);

        assert_eq!(stored, once);
        assert_eq!(stored.column("b"), Some("3"));
        assert_eq!(stored.column_count(), 3);
    }

    #[test]
    fn prefix_and_range_subsets_follow_key_order() {
        let entry = row(&[("O>l1>a", ""), ("O>l1>b", ""), ("O>l2>c", ""), ("I>l1>d", "")]);

        let prefixed = entry.columns_with_prefix("O>l1>a", false, "O>l1>");
        assert_eq!(prefixed, vec![Column::new("O>l1>b", "")]);

        let ranged = entry.columns_with_range("O>l1>a", true, "O>l2>c", false);
        let ranged: Vec<_> = ranged.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(ranged, vec!["O>l1>a", "O>l1>b"]);

        assert!(entry.contains_prefix("O>l2"));
        assert!(!entry.contains_prefix("O>l3"));
        assert!(entry.columns_with_range("b", true, "a", true).is_empty());
        assert!(entry.columns_with_range("a", false, "a", true).is_empty());
    }

    #[test]
    fn head_and_last_copies_partition_columns() {
        let entry = row(&[("a", "1"), ("b", "2"), ("c", "3")]);

        assert_eq!(keys(&entry.copy_head(2)), vec!["a", "b"]);
        assert_eq!(keys(&entry.copy_last(1)), vec!["c"]);
        assert_eq!(entry.copy_last(9).column_count(), 3);
        assert_eq!(entry.copy_head(2).id(), entry.id());
    }

    #[test]
    fn append_unions_json_arrays_and_overwrites_scalars() {
        let mut stored = row(&[("ids", "[1,2]"), ("name", "old")]);
        stored.append(&row(&[("ids", "[2,3]"), ("name", "new"), ("extra", "x")]));

        assert_eq!(stored.column("ids"), Some("[1,2,3]"));
        assert_eq!(stored.column("name"), Some("new"));
        assert_eq!(stored.column("extra"), Some("x"));
    }

    #[test]
    fn eliminate_removes_array_elements_or_whole_columns() {
        let mut stored = row(&[("ids", "[1,2,3]"), ("name", "v")]);
        stored.eliminate(&row(&[("ids", "[2]"), ("name", "")]));

        assert_eq!(stored.column("ids"), Some("[1,3]"));
        assert!(!stored.contains("name"));
    }

    #[test]
    fn remove_columns_ignores_missing_keys() {
        let mut stored = row(&[("a", "1"), ("b", "2")]);
        stored.remove_columns(&row(&[("b", ""), ("z", "")]));

        assert_eq!(keys(&stored), vec!["a"]);
    }
}
