//! Row stores backing the tables.
//!
//! Each store guards its map with one `RwLock`: a mutation of one row runs
//! under a single write acquisition, and reads copy rows out under a read
//! acquisition, so result sequences are snapshots that never observe a
//! half-applied mutation.

use crate::{entry::Entry, id::Id};
use derive_more::Deref;
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
};

///
/// RowStore
///
/// Storage discipline of a table's id → entry map.
///

pub trait RowStore: Default + Send + Sync {
    /// Copy of one row.
    fn get(&self, id: &Id) -> Option<Entry>;

    /// Run `f` on the slot of `id` under one write acquisition. Leaving the
    /// slot `None` removes the row; filling an empty slot stores it.
    fn update<R>(&self, id: &Id, f: impl FnOnce(&mut Option<Entry>) -> R) -> R;

    /// Remove every row `keep` rejects; returns how many were removed.
    fn retain(&self, keep: impl FnMut(&Id, &Entry) -> bool) -> usize;

    /// Map every row in store order, keeping the `Some` results.
    fn scan(&self, f: impl FnMut(&Id, &Entry) -> Option<Entry>) -> Vec<Entry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

///
/// OrderedRows
///
/// Insertion-ordered rows: iteration follows first insertion of each id.
///

#[derive(Default)]
pub struct OrderedRows {
    inner: RwLock<OrderedInner>,
}

#[derive(Default)]
struct OrderedInner {
    rows: HashMap<Id, (u64, Entry)>,
    order: BTreeMap<u64, Id>,
    next_seq: u64,
}

impl RowStore for OrderedRows {
    fn get(&self, id: &Id) -> Option<Entry> {
        self.inner.read().rows.get(id).map(|(_, e)| e.clone())
    }

    fn update<R>(&self, id: &Id, f: impl FnOnce(&mut Option<Entry>) -> R) -> R {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let (seq, mut slot) = match inner.rows.remove(id) {
            Some((seq, entry)) => (Some(seq), Some(entry)),
            None => (None, None),
        };
        let out = f(&mut slot);

        match (slot, seq) {
            (Some(entry), Some(seq)) => {
                inner.rows.insert(id.clone(), (seq, entry));
            }
            (Some(entry), None) => {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.order.insert(seq, id.clone());
                inner.rows.insert(id.clone(), (seq, entry));
            }
            (None, Some(seq)) => {
                inner.order.remove(&seq);
            }
            (None, None) => {}
        }

        out
    }

    fn retain(&self, mut keep: impl FnMut(&Id, &Entry) -> bool) -> usize {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let mut removed = Vec::new();
        inner.rows.retain(|id, (seq, entry)| {
            let kept = keep(id, entry);
            if !kept {
                removed.push(*seq);
            }
            kept
        });
        for seq in &removed {
            inner.order.remove(seq);
        }

        removed.len()
    }

    fn scan(&self, mut f: impl FnMut(&Id, &Entry) -> Option<Entry>) -> Vec<Entry> {
        let inner = self.inner.read();

        inner
            .order
            .values()
            .filter_map(|id| inner.rows.get(id).and_then(|(_, entry)| f(id, entry)))
            .collect()
    }

    fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    fn clear(&self) {
        *self.inner.write() = OrderedInner::default();
    }
}

///
/// SortedRows
///
/// Rows in id byte order, with floor/ceiling navigation for range scans.
///

#[derive(Default)]
pub struct SortedRows {
    inner: RwLock<BTreeMap<Id, Entry>>,
}

impl SortedRows {
    /// Greatest id `<= id`.
    #[must_use]
    pub fn floor_key(&self, id: &Id) -> Option<Id> {
        self.key_before(Bound::Included(id))
    }

    /// Greatest id `< id`.
    #[must_use]
    pub fn lower_key(&self, id: &Id) -> Option<Id> {
        self.key_before(Bound::Excluded(id))
    }

    /// Least row with id `>= id`.
    #[must_use]
    pub fn ceiling_entry(&self, id: &Id) -> Option<(Id, Entry)> {
        self.entry_after(Bound::Included(id))
    }

    /// Least row with id `> id`.
    #[must_use]
    pub fn higher_entry(&self, id: &Id) -> Option<(Id, Entry)> {
        self.entry_after(Bound::Excluded(id))
    }

    #[must_use]
    pub fn last_key(&self) -> Option<Id> {
        self.key_before(Bound::Unbounded)
    }

    fn key_before(&self, upper: Bound<&Id>) -> Option<Id> {
        self.inner
            .read()
            .range::<Id, _>((Bound::Unbounded, upper))
            .next_back()
            .map(|(k, _)| k.clone())
    }

    fn entry_after(&self, lower: Bound<&Id>) -> Option<(Id, Entry)> {
        self.inner
            .read()
            .range::<Id, _>((lower, Bound::Unbounded))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Remove every id in `[min, max)`, or `[min, ..)` without `max`.
    pub fn remove_range(&self, min: &Id, max: Option<&Id>) -> usize {
        let mut map = self.inner.write();

        let mut tail = map.split_off(min);
        let mut kept = match max {
            Some(max) => tail.split_off(max),
            None => BTreeMap::new(),
        };
        let removed = tail.len();
        map.append(&mut kept);

        removed
    }
}

impl RowStore for SortedRows {
    fn get(&self, id: &Id) -> Option<Entry> {
        self.inner.read().get(id).cloned()
    }

    fn update<R>(&self, id: &Id, f: impl FnOnce(&mut Option<Entry>) -> R) -> R {
        let mut map = self.inner.write();

        let mut slot = map.remove(id);
        let out = f(&mut slot);
        if let Some(entry) = slot {
            map.insert(id.clone(), entry);
        }

        out
    }

    fn retain(&self, mut keep: impl FnMut(&Id, &Entry) -> bool) -> usize {
        let mut map = self.inner.write();
        let before = map.len();
        map.retain(|id, entry| keep(id, entry));

        before - map.len()
    }

    fn scan(&self, mut f: impl FnMut(&Id, &Entry) -> Option<Entry>) -> Vec<Entry> {
        self.inner
            .read()
            .iter()
            .filter_map(|(id, entry)| f(id, entry))
            .collect()
    }

    fn len(&self) -> usize {
        self.inner.read().len()
    }

    fn clear(&self) {
        self.inner.write().clear();
    }
}

///
/// RowMap
///
/// Query-local result rows keyed by id, in first-seen order. Rows that
/// resolve to an id already present merge into it.
///

#[derive(Debug, Default, Deref)]
pub struct RowMap {
    #[deref]
    rows: Vec<Entry>,
    index: HashMap<Id, usize>,
}

impl RowMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row, merging its columns into an earlier row with the same id.
    pub fn merge(&mut self, entry: Entry) {
        match self.index.get(entry.id()) {
            Some(&pos) => self.rows[pos].merge(&entry),
            None => {
                self.index.insert(entry.id().clone(), self.rows.len());
                self.rows.push(entry);
            }
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Entry> {
        self.rows
    }
}

///
/// TESTS
///
