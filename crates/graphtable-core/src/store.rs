//! Table registry and mutation routing for one in-memory store.

use crate::{
    config::StoreConfig,
    entry::Entry,
    error::InternalError,
    paginate::EntryIter,
    query::Query,
    table::MemoryTable,
    types::TableType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// MutationAction
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Insert,
    Delete,
    Append,
    Eliminate,
}

///
/// Mutation
///
/// One entry plus what to do with it. The entry's table type picks the
/// table.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Mutation {
    pub action: MutationAction,
    pub entry: Entry,
}

impl Mutation {
    #[must_use]
    pub const fn new(action: MutationAction, entry: Entry) -> Self {
        Self { action, entry }
    }

    #[must_use]
    pub const fn insert(entry: Entry) -> Self {
        Self::new(MutationAction::Insert, entry)
    }

    #[must_use]
    pub const fn delete(entry: Entry) -> Self {
        Self::new(MutationAction::Delete, entry)
    }

    #[must_use]
    pub const fn append(entry: Entry) -> Self {
        Self::new(MutationAction::Append, entry)
    }

    #[must_use]
    pub const fn eliminate(entry: Entry) -> Self {
        Self::new(MutationAction::Eliminate, entry)
    }
}

///
/// MemoryStore
///
/// Owns one table per registered type and routes mutations by entry type
/// and queries by result type. A schema store and a graph store register
/// different subsets.
///

pub struct MemoryStore {
    config: StoreConfig,
    tables: BTreeMap<TableType, MemoryTable>,
}

impl MemoryStore {
    /// Store with every table type registered.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self::with_tables(config, TableType::ALL)
    }

    #[must_use]
    pub fn with_tables(config: StoreConfig, types: impl IntoIterator<Item = TableType>) -> Self {
        let tables: BTreeMap<_, _> = types
            .into_iter()
            .map(|ty| (ty, MemoryTable::new(ty, config.shard_kind)))
            .collect();
        tracing::debug!(tables = tables.len(), ?config, "memory store opened");

        Self { config, tables }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Registered table types, in routing order.
    pub fn table_types(&self) -> impl Iterator<Item = TableType> + '_ {
        self.tables.keys().copied()
    }

    pub fn table(&self, table_type: TableType) -> Result<&MemoryTable, InternalError> {
        self.tables
            .get(&table_type)
            .ok_or_else(|| InternalError::table_not_found(table_type))
    }

    pub fn apply(&self, mutation: &Mutation) -> Result<(), InternalError> {
        let table = self.table(mutation.entry.table_type())?;

        match mutation.action {
            MutationAction::Insert => table.insert(&mutation.entry),
            MutationAction::Delete => table.delete(&mutation.entry),
            MutationAction::Append => table.append(&mutation.entry),
            MutationAction::Eliminate => table.eliminate(&mutation.entry),
        }
    }

    /// Apply mutations in order, stopping at the first failure. Mutations
    /// applied before the failure stay applied.
    pub fn mutate(&self, mutations: &[Mutation]) -> Result<(), InternalError> {
        for (i, mutation) in mutations.iter().enumerate() {
            if let Err(err) = self.apply(mutation) {
                tracing::warn!(
                    applied = i,
                    total = mutations.len(),
                    error = %err.display_with_class(),
                    "mutation batch stopped"
                );
                return Err(err);
            }
        }

        Ok(())
    }

    pub fn query(&self, query: &Query) -> Result<EntryIter, InternalError> {
        self.table(query.result_type())?.query(query)
    }

    pub fn count(&self, query: &Query) -> Result<u64, InternalError> {
        self.table(query.result_type())?.count(query)
    }

    /// Attach a caller's offset and raw limit, read per the configured
    /// limit convention.
    #[must_use]
    pub const fn paged(&self, query: Query, offset: u64, raw_limit: u64) -> Query {
        query.offset(offset).limit(self.config.limit.resolve(raw_limit))
    }

    /// Empty every registered table.
    pub fn clear(&self) {
        for table in self.tables.values() {
            table.clear();
        }
        tracing::debug!(tables = self.tables.len(), "memory store cleared");
    }

    /// Empty one table.
    pub fn truncate(&self, table_type: TableType) -> Result<(), InternalError> {
        self.table(table_type)?.clear();

        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

///
/// TESTS
///
