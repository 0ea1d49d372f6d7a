//! Composite index ids.
//!
//! String index tables splice `label > value`; range and shard tables
//! write a 4-byte label followed by the ordered numeric encoding of the
//! value, so every label owns one contiguous region of the sorted key
//! space and `label + 1` starts the next one.

mod ordered;

use crate::{
    error::{ErrorOrigin, InternalError},
    id::{Id, concat, splice_prefix},
    types::TableType,
    value::{FieldValue, NumericKind},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Column carrying the index label id on label-wide delete entries.
pub const INDEX_LABEL_COLUMN: &str = "index_label_id";

///
/// IndexLabelId
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct IndexLabelId(u32);

impl IndexLabelId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The label immediately above this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

/// Build the composite id of one `(label, value)` pair in a table.
///
/// Range tables require `numeric_kind`; the value is coerced to it so ids
/// built from int and long literals land in the same key space.
pub fn format_index_id(
    table_type: TableType,
    label: IndexLabelId,
    value: Option<&FieldValue>,
    numeric_kind: Option<NumericKind>,
) -> Result<Id, InternalError> {
    if table_type.is_string_index() {
        let text = value.map(FieldValue::to_text).unwrap_or_default();

        return Ok(Id::string(concat(&[label.to_string(), text])));
    }

    let kind = match (table_type.is_range_index(), numeric_kind) {
        (true, Some(kind)) => kind,
        _ => {
            return Err(InternalError::query_shape(
                ErrorOrigin::Index,
                format!("table '{table_type}' does not build numeric index ids"),
            ));
        }
    };

    let mut bytes = Vec::with_capacity(4 + kind.width());
    bytes.extend_from_slice(&label.get().to_be_bytes());
    if let Some(value) = value {
        let encoded = ordered::ordered_number_bytes(value, kind).ok_or_else(|| {
            InternalError::query_shape(
                ErrorOrigin::Index,
                format!(
                    "range index value {value} ({}) is not a {kind:?} number",
                    value.kind_label()
                ),
            )
        })?;
        bytes.extend_from_slice(&encoded);
    }

    Ok(Id::from_bytes(bytes))
}

/// Prefix shared by every string index id of one label.
#[must_use]
pub fn string_label_prefix(label: IndexLabelId) -> String {
    splice_prefix(&[label.to_string()])
}

///
/// TESTS
///
