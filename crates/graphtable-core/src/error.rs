use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured table error with a stable classification.
/// Every failure surfaced by the tables is synchronous and final for the
/// call that produced it; nothing in this crate retries.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an edge-origin unsupported operation error.
    pub(crate) fn edge_unsupported(operation: &str) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Edge,
            format!("unsupported operation: edge {operation}"),
        )
    }

    /// Construct a query-origin shape error.
    pub(crate) fn query_shape(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidQueryShape, origin, message)
    }

    /// Construct an index-origin missing column error.
    pub(crate) fn index_missing_column(column: &str, found: usize) -> Self {
        Self::new(
            ErrorClass::MissingRequiredColumn,
            ErrorOrigin::Index,
            format!("expect exactly one '{column}' column, but got {found} column(s)"),
        )
    }

    /// Construct an index-origin empty range error.
    pub(crate) fn index_empty_range() -> Self {
        Self::new(
            ErrorClass::EmptyRangeArgument,
            ErrorOrigin::Index,
            "range index query must specify at least one bound",
        )
    }

    /// Construct an id-origin malformed id error.
    pub(crate) fn invalid_id(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidId, ErrorOrigin::Id, message)
    }

    /// Construct a store-origin missing table error.
    pub(crate) fn table_not_found(table: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Store,
            format!("table '{table}' is not registered in this store"),
        )
    }

    /// Construct a config-origin error.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Config, ErrorOrigin::Config, message)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }

    #[must_use]
    pub const fn is_invalid_query_shape(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidQueryShape)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Error taxonomy for caller-side classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unsupported,
    InvalidQueryShape,
    MissingRequiredColumn,
    EmptyRangeArgument,
    InvalidId,
    NotFound,
    Config,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::InvalidQueryShape => "invalid_query_shape",
            Self::MissingRequiredColumn => "missing_required_column",
            Self::EmptyRangeArgument => "empty_range_argument",
            Self::InvalidId => "invalid_id",
            Self::NotFound => "not_found",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Which layer of the engine rejected the call.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Edge,
    Index,
    Query,
    Id,
    Store,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Edge => "edge",
            Self::Index => "index",
            Self::Query => "query",
            Self::Id => "id",
            Self::Store => "store",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = InternalError::edge_unsupported("append");

        assert!(err.is_unsupported());
        assert_eq!(
            err.display_with_class(),
            "edge:unsupported: unsupported operation: edge append"
        );
    }

    #[test]
    fn missing_column_reports_found_count() {
        let err = InternalError::index_missing_column("index_label_id", 0);

        assert_eq!(err.class, ErrorClass::MissingRequiredColumn);
        assert_eq!(err.origin, ErrorOrigin::Index);
        assert!(err.message.contains("got 0 column(s)"));
    }
}
