//! ## Crate layout
//! - `core`: tables, ids, queries, pagination, the store, and observability.
//! - `error`: public error type with a stable kind + origin taxonomy.
//!
//! The `prelude` module carries the vocabulary needed to build entries and
//! queries and to drive a [`MemoryStore`].

pub use graphtable_core as core;

pub mod error;

pub use core::{
    config::{LimitConvention, StoreConfig},
    obs::{metrics_report, metrics_reset_all},
    store::{MemoryStore, Mutation, MutationAction},
};
pub use error::Error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open a store with every table registered, configured from TOML text.
pub fn open(config_toml: &str) -> Result<MemoryStore, Error> {
    let config = StoreConfig::from_toml_str(config_toml)?;

    Ok(MemoryStore::new(config))
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        id::{concat, split},
        index::{INDEX_LABEL_COLUMN, format_index_id},
        prelude::*,
        query::LABEL_COLUMN,
        table::edge_entry,
    };
    pub use crate::{MemoryStore, Mutation, MutationAction, StoreConfig};
}
