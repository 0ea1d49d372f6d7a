//! Offset/limit over entry sequences.
//!
//! Windows are measured per table: row tables count one per entry, edge
//! tables count columns because one owner row carries many edges. When a
//! window boundary falls inside a row, the row is split into a head or tail
//! copy; a column itself is never split and column order is kept.

use crate::entry::Entry;
use std::iter;

/// Owned, lazily consumed result sequence.
pub type EntryIter = Box<dyn Iterator<Item = Entry> + Send>;

///
/// EntryMeasure
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryMeasure {
    Rows,
    Columns,
}

impl EntryMeasure {
    #[must_use]
    pub fn size_of(self, entry: &Entry) -> u64 {
        match self {
            Self::Rows => 1,
            Self::Columns => entry.column_count() as u64,
        }
    }
}

/// Skip `offset` measured elements.
///
/// A row straddling the offset comes back as a tail copy holding only its
/// unskipped columns; an offset past the end yields nothing.
pub fn skip_offset(mut entries: EntryIter, offset: u64, measure: EntryMeasure) -> EntryIter {
    let mut count = 0u64;
    let mut last = None;
    while count < offset {
        let Some(entry) = entries.next() else {
            break;
        };
        count += measure.size_of(&entry);
        last = Some(entry);
    }

    if count == offset {
        return entries;
    }
    if count < offset {
        return Box::new(iter::empty());
    }
    let Some(last) = last else {
        return entries;
    };

    let remaining = usize::try_from(count - offset).unwrap_or(usize::MAX);
    let split = last.copy_last(remaining);

    Box::new(iter::once(split).chain(entries))
}

/// Keep at most `limit` measured elements, truncating the row that
/// crosses the limit to a head copy.
pub fn drop_tails(mut entries: EntryIter, limit: u64, measure: EntryMeasure) -> EntryIter {
    let mut count = 0u64;
    let mut kept = Vec::new();
    while count < limit {
        let Some(entry) = entries.next() else {
            break;
        };
        count += measure.size_of(&entry);
        kept.push(entry);
    }

    if count > limit
        && let Some(last) = kept.pop()
    {
        let before = count - measure.size_of(&last);
        let head = usize::try_from(limit - before).unwrap_or(usize::MAX);
        kept.push(last.copy_head(head));
    }

    Box::new(kept.into_iter())
}

/// Apply offset then optional limit.
pub fn paginate(
    entries: EntryIter,
    offset: u64,
    limit: Option<u64>,
    measure: EntryMeasure,
) -> EntryIter {
    let entries = if offset > 0 {
        skip_offset(entries, offset, measure)
    } else {
        entries
    };

    match limit {
        Some(limit) => drop_tails(entries, limit, measure),
        None => entries,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{id::Id, types::TableType};
    use proptest::prelude::*;

    fn row(id: &str, columns: usize) -> Entry {
        (0..columns).fold(Entry::new(TableType::EdgeOut, Id::string(id)), |e, i| {
            e.with_column(format!("c{i:03}"), format!("{id}-{i}"))
        })
    }

    fn boxed(entries: Vec<Entry>) -> EntryIter {
        Box::new(entries.into_iter())
    }

    fn flatten(entries: EntryIter) -> Vec<(String, String)> {
        entries
            .flat_map(|e| {
                let id = e.id().to_string();
                e.column_keys()
                    .map(|k| (id.clone(), k.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn skip_offset_splits_straddling_row() {
        let rows = vec![row("a", 2), row("b", 3)];
        let out: Vec<Entry> = skip_offset(boxed(rows), 3, EntryMeasure::Columns).collect();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id(), &Id::string("b"));
        assert_eq!(out[0].column_keys().collect::<Vec<_>>(), vec!["c001", "c002"]);
    }

    #[test]
    fn skip_offset_past_end_is_empty() {
        let rows = vec![row("a", 2)];

        assert_eq!(skip_offset(boxed(rows), 3, EntryMeasure::Columns).count(), 0);
    }

    #[test]
    fn drop_tails_truncates_crossing_row() {
        let rows = vec![row("a", 2), row("b", 3), row("c", 1)];
        let out: Vec<Entry> = drop_tails(boxed(rows), 3, EntryMeasure::Columns).collect();

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].column_keys().collect::<Vec<_>>(), vec!["c000"]);
    }

    #[test]
    fn row_measure_counts_entries() {
        let rows = vec![row("a", 5), row("b", 5), row("c", 5)];
        let out: Vec<Entry> = paginate(boxed(rows), 1, Some(1), EntryMeasure::Rows).collect();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id(), &Id::string("b"));
        assert_eq!(out[0].column_count(), 5);
    }

    #[test]
    fn zero_limit_returns_nothing_and_none_is_unbounded() {
        let rows = vec![row("a", 2), row("b", 2)];

        assert_eq!(paginate(boxed(rows.clone()), 0, Some(0), EntryMeasure::Columns).count(), 0);
        assert_eq!(paginate(boxed(rows), 0, None, EntryMeasure::Columns).count(), 2);
    }

    proptest! {
        #[test]
        fn offset_and_limit_partition_all_columns(
            sizes in prop::collection::vec(0usize..5, 0..6),
            cut in 0u64..24,
        ) {
            let rows: Vec<Entry> = sizes
                .iter()
                .enumerate()
                .map(|(i, n)| row(&format!("r{i}"), *n))
                .collect();
            let total: u64 = sizes.iter().map(|n| *n as u64).sum();
            let cut = cut.min(total);
            let expected = flatten(boxed(rows.clone()));

            let mut rebuilt = flatten(drop_tails(boxed(rows.clone()), cut, EntryMeasure::Columns));
            rebuilt.extend(flatten(skip_offset(boxed(rows), cut, EntryMeasure::Columns)));

            prop_assert_eq!(rebuilt, expected);
        }
    }
}
