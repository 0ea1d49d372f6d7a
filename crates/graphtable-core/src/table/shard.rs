use crate::{table::range::RangeIndexTable, types::TableType, value::NumericKind};
use derive_more::Deref;

///
/// ShardIndexTable
///
/// Range index under its own type tag so the store routes shard queries
/// apart from ordinary range queries. Ids encode values as the configured
/// numeric kind.
///

#[derive(Deref)]
pub struct ShardIndexTable(RangeIndexTable);

impl ShardIndexTable {
    #[must_use]
    pub fn new(numeric_kind: NumericKind) -> Self {
        Self(RangeIndexTable::with_kind(TableType::ShardIndex, numeric_kind))
    }
}

impl Default for ShardIndexTable {
    fn default() -> Self {
        Self::new(NumericKind::default())
    }
}

///
/// TESTS
///
