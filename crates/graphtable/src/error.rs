use derive_more::Display;
use graphtable_core::error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Unsupported => ErrorKind::Update(UpdateErrorKind::Unsupported),
            ErrorClass::MissingRequiredColumn => ErrorKind::Update(UpdateErrorKind::MissingColumn),
            ErrorClass::InvalidQueryShape => ErrorKind::Query(QueryErrorKind::Invalid),
            ErrorClass::EmptyRangeArgument => ErrorKind::Query(QueryErrorKind::EmptyRange),
            ErrorClass::InvalidId => ErrorKind::InvalidId,
            ErrorClass::NotFound => ErrorKind::Store(StoreErrorKind::NotFound),
            ErrorClass::Config => ErrorKind::Config,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),
    Update(UpdateErrorKind),
    Store(StoreErrorKind),

    /// An id could not be decomposed into its parts.
    InvalidId,

    /// Store configuration could not be read.
    Config,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Query shape does not fit the table it was routed to.
    Invalid,

    /// Range query named neither a lower nor an upper bound.
    EmptyRange,
}

///
/// UpdateErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum UpdateErrorKind {
    /// The table never accepts this mutation.
    Unsupported,

    /// A label-wide delete entry lacked its index label column.
    MissingColumn,
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    NotFound,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Edge,
    Index,
    Query,
    Id,
    Store,
    Config,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Edge => Self::Edge,
            CoreErrorOrigin::Index => Self::Index,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Id => Self::Id,
            CoreErrorOrigin::Store => Self::Store,
            CoreErrorOrigin::Config => Self::Config,
        }
    }
}
