//! Query vocabulary: one selector per query plus offset/limit.

mod range;

pub use range::RangeConditions;

use crate::{
    entry::Entry,
    error::{ErrorOrigin, InternalError},
    id::Id,
    types::TableType,
    value::FieldValue,
};
use std::{cmp::Ordering, fmt};

/// Column that stores the label of vertex rows.
pub const LABEL_COLUMN: &str = "label";

///
/// Query
///

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    result_type: TableType,
    selector: QuerySelector,
    offset: u64,
    limit: Option<u64>,
}

impl Query {
    #[must_use]
    pub const fn new(result_type: TableType, selector: QuerySelector) -> Self {
        Self {
            result_type,
            selector,
            offset: 0,
            limit: None,
        }
    }

    #[must_use]
    pub fn by_ids(result_type: TableType, ids: impl IntoIterator<Item = Id>) -> Self {
        Self::new(result_type, QuerySelector::Ids(ids.into_iter().collect()))
    }

    #[must_use]
    pub const fn by_id_prefix(
        result_type: TableType,
        start: Id,
        inclusive_start: bool,
        prefix: Id,
    ) -> Self {
        Self::new(
            result_type,
            QuerySelector::IdPrefix {
                start,
                inclusive_start,
                prefix,
            },
        )
    }

    #[must_use]
    pub const fn by_id_range(
        result_type: TableType,
        start: Id,
        inclusive_start: bool,
        end: Id,
        inclusive_end: bool,
    ) -> Self {
        Self::new(
            result_type,
            QuerySelector::IdRange {
                start,
                inclusive_start,
                end,
                inclusive_end,
            },
        )
    }

    #[must_use]
    pub fn by_conditions(
        result_type: TableType,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Self {
        Self::new(
            result_type,
            QuerySelector::Conditions(conditions.into_iter().collect()),
        )
    }

    /// Condition query without conditions: every row of the table.
    #[must_use]
    pub const fn all(result_type: TableType) -> Self {
        Self::new(result_type, QuerySelector::Conditions(Vec::new()))
    }

    /// Number of measured elements to skip.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Maximum number of measured elements to return; `Some(0)` returns
    /// nothing.
    #[must_use]
    pub const fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn result_type(&self) -> TableType {
        self.result_type
    }

    #[must_use]
    pub const fn selector(&self) -> &QuerySelector {
        &self.selector
    }

    #[must_use]
    pub const fn offset_value(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub const fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    /// Relations of a condition query, or a shape error naming `origin`.
    pub fn conditions(&self, origin: ErrorOrigin) -> Result<&[Condition], InternalError> {
        match &self.selector {
            QuerySelector::Conditions(conditions) => Ok(conditions),
            other => Err(InternalError::query_shape(
                origin,
                format!("{} query must be a condition query, but got {other}", self.result_type),
            )),
        }
    }
}

///
/// QuerySelector
///
/// The single row-resolution strategy of a query.
///

#[derive(Clone, Debug, PartialEq)]
pub enum QuerySelector {
    Ids(Vec<Id>),
    IdPrefix {
        start: Id,
        inclusive_start: bool,
        prefix: Id,
    },
    IdRange {
        start: Id,
        inclusive_start: bool,
        end: Id,
        inclusive_end: bool,
    },
    Conditions(Vec<Condition>),
}

impl QuerySelector {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ids(_) => "ids",
            Self::IdPrefix { .. } => "id_prefix",
            Self::IdRange { .. } => "id_range",
            Self::Conditions(_) => "conditions",
        }
    }
}

impl fmt::Display for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ids(ids) => write!(f, "ids({})", ids.len()),
            Self::IdPrefix { start, prefix, .. } => write!(f, "id_prefix({start}, {prefix})"),
            Self::IdRange { start, end, .. } => write!(f, "id_range({start}, {end})"),
            Self::Conditions(conditions) => {
                f.write_str("conditions[")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("]")
            }
        }
    }
}

///
/// ConditionKey
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ConditionKey {
    Label,
    FieldValues,
    IndexLabelId,
    Column(String),
}

impl ConditionKey {
    /// Column a filter reads for this key, if it maps onto one.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Label => Some(LABEL_COLUMN),
            Self::Column(name) => Some(name.as_str()),
            Self::FieldValues | Self::IndexLabelId => None,
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => f.write_str("LABEL"),
            Self::FieldValues => f.write_str("FIELD_VALUES"),
            Self::IndexLabelId => f.write_str("INDEX_LABEL_ID"),
            Self::Column(name) => f.write_str(name),
        }
    }
}

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RelationKind {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RelationKind {
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Gt => ordering.is_gt(),
            Self::Gte => ordering.is_ge(),
            Self::Lt => ordering.is_lt(),
            Self::Lte => ordering.is_le(),
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

///
/// Condition
///
/// One `key relation value` triple.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub key: ConditionKey,
    pub relation: RelationKind,
    pub value: FieldValue,
}

impl Condition {
    #[must_use]
    pub fn new(key: ConditionKey, relation: RelationKind, value: impl Into<FieldValue>) -> Self {
        Self {
            key,
            relation,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn equals(key: ConditionKey, value: impl Into<FieldValue>) -> Self {
        Self::new(key, RelationKind::Eq, value)
    }

    /// Evaluate against a row's columns; keys without a column never match.
    ///
    /// Numeric values compare numerically when the column parses as a
    /// number, text otherwise.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn test(&self, entry: &Entry) -> bool {
        let Some(column) = self.key.column().and_then(|name| entry.column(name)) else {
            return false;
        };

        let ordering = match &self.value {
            FieldValue::Text(expected) => Some(column.cmp(expected.as_str())),
            FieldValue::Int(v) => compare_number(column, f64::from(*v)),
            FieldValue::Long(v) => compare_number(column, *v as f64),
            FieldValue::Float(v) => compare_number(column, f64::from(*v)),
            FieldValue::Double(v) => compare_number(column, *v),
        };

        ordering.is_some_and(|o| self.relation.accepts(o))
    }
}

fn compare_number(column: &str, expected: f64) -> Option<Ordering> {
    column
        .parse::<f64>()
        .ok()
        .and_then(|actual| actual.partial_cmp(&expected))
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.relation.symbol(), self.value)
    }
}

///
/// TESTS
///
