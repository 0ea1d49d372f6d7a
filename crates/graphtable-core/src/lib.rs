//! Core of graphtable: in-memory backend tables for the vertices, edges
//! and indexes of a graph store, plus the store that routes between them.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod entry;
pub mod error;
pub mod id;
pub mod index;
pub mod obs;
pub mod paginate;
pub mod query;
pub mod store;
pub mod table;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, tables, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        entry::{Column, Entry},
        id::{Direction, EdgeId, Id},
        index::IndexLabelId,
        query::{Condition, ConditionKey, Query, QuerySelector, RelationKind},
        types::TableType,
        value::{FieldValue, NumericKind},
    };
}
