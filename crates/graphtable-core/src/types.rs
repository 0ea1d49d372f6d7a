use crate::value::NumericKind;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TableType
///
/// Type tag of one backend table. Entries carry it so the store can route
/// mutations; queries carry it as their result type.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    Vertex,
    EdgeOut,
    EdgeIn,
    SecondaryIndex,
    SearchIndex,
    UniqueIndex,
    RangeIntIndex,
    RangeFloatIndex,
    RangeLongIndex,
    RangeDoubleIndex,
    ShardIndex,
}

impl TableType {
    /// Every table a full store keeps, in routing order.
    pub const ALL: [Self; 11] = [
        Self::Vertex,
        Self::EdgeOut,
        Self::EdgeIn,
        Self::SecondaryIndex,
        Self::SearchIndex,
        Self::UniqueIndex,
        Self::RangeIntIndex,
        Self::RangeFloatIndex,
        Self::RangeLongIndex,
        Self::RangeDoubleIndex,
        Self::ShardIndex,
    ];

    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::EdgeOut | Self::EdgeIn)
    }

    /// Index tables whose ids splice the field value as text.
    #[must_use]
    pub const fn is_string_index(self) -> bool {
        matches!(
            self,
            Self::SecondaryIndex | Self::SearchIndex | Self::UniqueIndex
        )
    }

    /// Index tables whose ids encode the field value as ordered bytes.
    #[must_use]
    pub const fn is_range_index(self) -> bool {
        matches!(
            self,
            Self::RangeIntIndex
                | Self::RangeFloatIndex
                | Self::RangeLongIndex
                | Self::RangeDoubleIndex
                | Self::ShardIndex
        )
    }

    #[must_use]
    pub const fn is_index(self) -> bool {
        self.is_string_index() || self.is_range_index()
    }

    /// Numeric kind of a range table; shard tables use the configured kind.
    #[must_use]
    pub const fn numeric_kind(self) -> Option<NumericKind> {
        match self {
            Self::RangeIntIndex => Some(NumericKind::Int),
            Self::RangeFloatIndex => Some(NumericKind::Float),
            Self::RangeLongIndex => Some(NumericKind::Long),
            Self::RangeDoubleIndex => Some(NumericKind::Double),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::EdgeOut => "edge_out",
            Self::EdgeIn => "edge_in",
            Self::SecondaryIndex => "secondary_index",
            Self::SearchIndex => "search_index",
            Self::UniqueIndex => "unique_index",
            Self::RangeIntIndex => "range_int_index",
            Self::RangeFloatIndex => "range_float_index",
            Self::RangeLongIndex => "range_long_index",
            Self::RangeDoubleIndex => "range_double_index",
            Self::ShardIndex => "shard_index",
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///
