//! Backend tables: one generic row table plus the edge, string-index and
//! range-index specializations built on it.

mod base;
mod edge;
mod index;
mod range;
mod rows;
mod shard;

pub use base::BaseTable;
pub use edge::{EdgeTable, edge_entry};
pub use index::SecondaryIndexTable;
pub use range::RangeIndexTable;
pub use rows::{OrderedRows, RowMap, RowStore, SortedRows};
pub use shard::ShardIndexTable;

use crate::{
    entry::Entry,
    error::InternalError,
    id::Direction,
    paginate::{EntryIter, EntryMeasure},
    query::Query,
    types::TableType,
    value::NumericKind,
};

/// Vertex rows need no specialization.
pub type VertexTable = BaseTable<OrderedRows>;

///
/// MemoryTable
///
/// Closed set of table variants a store routes to. Every variant answers
/// the same calls; variants that reject a call say so with an error.
///

pub enum MemoryTable {
    Vertex(VertexTable),
    Edge(EdgeTable),
    SecondaryIndex(SecondaryIndexTable),
    RangeIndex(RangeIndexTable),
    ShardIndex(ShardIndexTable),
}

impl MemoryTable {
    /// Table of the given type; `shard_kind` only applies to shard tables.
    #[must_use]
    pub fn new(table_type: TableType, shard_kind: NumericKind) -> Self {
        match table_type {
            TableType::Vertex => {
                Self::Vertex(VertexTable::new(TableType::Vertex, EntryMeasure::Rows))
            }
            TableType::EdgeOut => Self::Edge(EdgeTable::new(Direction::Out)),
            TableType::EdgeIn => Self::Edge(EdgeTable::new(Direction::In)),
            TableType::SecondaryIndex | TableType::SearchIndex | TableType::UniqueIndex => {
                Self::SecondaryIndex(SecondaryIndexTable::new(table_type))
            }
            TableType::RangeIntIndex
            | TableType::RangeFloatIndex
            | TableType::RangeLongIndex
            | TableType::RangeDoubleIndex => Self::RangeIndex(RangeIndexTable::new(table_type)),
            TableType::ShardIndex => Self::ShardIndex(ShardIndexTable::new(shard_kind)),
        }
    }

    #[must_use]
    pub fn table_type(&self) -> TableType {
        match self {
            Self::Vertex(t) => t.table_type(),
            Self::Edge(t) => t.table_type(),
            Self::SecondaryIndex(t) => t.table_type(),
            Self::RangeIndex(t) => t.table_type(),
            Self::ShardIndex(t) => t.table_type(),
        }
    }

    pub fn insert(&self, entry: &Entry) -> Result<(), InternalError> {
        match self {
            Self::Vertex(t) => t.insert(entry),
            Self::Edge(t) => t.insert(entry),
            Self::SecondaryIndex(t) => t.insert(entry),
            Self::RangeIndex(t) => t.insert(entry),
            Self::ShardIndex(t) => t.insert(entry),
        }

        Ok(())
    }

    /// Column delete for vertex and edge rows, label-wide eviction for
    /// index tables.
    pub fn delete(&self, entry: &Entry) -> Result<(), InternalError> {
        match self {
            Self::Vertex(t) => {
                t.delete(entry);
                Ok(())
            }
            Self::Edge(t) => {
                t.delete(entry);
                Ok(())
            }
            Self::SecondaryIndex(t) => t.delete(entry),
            Self::RangeIndex(t) => t.delete(entry),
            Self::ShardIndex(t) => t.delete(entry),
        }
    }

    pub fn append(&self, entry: &Entry) -> Result<(), InternalError> {
        match self {
            Self::Vertex(t) => t.append(entry),
            Self::Edge(t) => t.append(entry)?,
            Self::SecondaryIndex(t) => t.append(entry),
            Self::RangeIndex(t) => t.append(entry),
            Self::ShardIndex(t) => t.append(entry),
        }

        Ok(())
    }

    pub fn eliminate(&self, entry: &Entry) -> Result<(), InternalError> {
        match self {
            Self::Vertex(t) => t.eliminate(entry),
            Self::Edge(t) => t.eliminate(entry)?,
            Self::SecondaryIndex(t) => t.eliminate(entry),
            Self::RangeIndex(t) => t.eliminate(entry),
            Self::ShardIndex(t) => t.eliminate(entry),
        }

        Ok(())
    }

    pub fn query(&self, query: &Query) -> Result<EntryIter, InternalError> {
        match self {
            Self::Vertex(t) => t.query(query),
            Self::Edge(t) => t.query(query),
            Self::SecondaryIndex(t) => t.query(query),
            Self::RangeIndex(t) => t.query(query),
            Self::ShardIndex(t) => t.query(query),
        }
    }

    /// Measured size of a query's result: edges for edge tables, rows
    /// everywhere else.
    pub fn count(&self, query: &Query) -> Result<u64, InternalError> {
        match self {
            Self::Vertex(t) => t.count(query),
            Self::Edge(t) => t.count(query),
            Self::SecondaryIndex(t) => t.count(query),
            Self::RangeIndex(t) => t.count(query),
            Self::ShardIndex(t) => t.count(query),
        }
    }

    pub fn clear(&self) {
        match self {
            Self::Vertex(t) => t.clear(),
            Self::Edge(t) => t.clear(),
            Self::SecondaryIndex(t) => t.clear(),
            Self::RangeIndex(t) => t.clear(),
            Self::ShardIndex(t) => t.clear(),
        }
    }

    /// Number of stored rows (owner rows for edge tables).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Vertex(t) => t.len(),
            Self::Edge(t) => t.len(),
            Self::SecondaryIndex(t) => t.len(),
            Self::RangeIndex(t) => t.len(),
            Self::ShardIndex(t) => t.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;

    #[test]
    fn every_table_type_builds_a_table_of_that_type() {
        for ty in TableType::ALL {
            let table = MemoryTable::new(ty, NumericKind::Long);
            assert_eq!(table.table_type(), ty);
            assert!(table.is_empty());
        }
    }

    #[test]
    fn edge_variant_surfaces_unsupported_mutations() {
        let table = MemoryTable::new(TableType::EdgeIn, NumericKind::Long);
        let entry =
            Entry::new(TableType::EdgeIn, Id::string("v1>I>l>>v2")).with_column("I>l>>v2", "");

        assert!(table.append(&entry).expect_err("append").is_unsupported());
        assert!(table.eliminate(&entry).expect_err("eliminate").is_unsupported());
        assert!(table.insert(&entry).is_ok());
        assert_eq!(table.len(), 1);
    }
}
