use crate::{
    error::InternalError,
    id::{Id, concat, split},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of parts in a complete edge id.
pub const EDGE_ID_PARTS: usize = 5;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Direction {
    Out,
    In,
}

impl Direction {
    /// Single-letter code stored as the first column-key part.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Out => "O",
            Self::In => "I",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "O" => Some(Self::Out),
            "I" => Some(Self::In),
            _ => None,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

///
/// EdgeId
///
/// Logical edge identity: `owner > direction > label > sort values > other`.
/// The owner vertex row stores the edge under the column key made of every
/// part after the owner.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct EdgeId {
    pub owner: String,
    pub direction: Direction,
    pub label: String,
    pub sort_values: String,
    pub other: String,
}

impl EdgeId {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        direction: Direction,
        label: impl Into<String>,
        sort_values: impl Into<String>,
        other: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            direction,
            label: label.into(),
            sort_values: sort_values.into(),
            other: other.into(),
        }
    }

    /// Parse a complete spliced edge id.
    pub fn parse(id: &Id) -> Result<Self, InternalError> {
        let text = id.as_string();
        let parts = split(&text);
        let [owner, direction, label, sort_values, other]: [String; EDGE_ID_PARTS] = parts
            .try_into()
            .map_err(|parts: Vec<String>| {
                InternalError::invalid_id(format!(
                    "edge id '{text}' has {} parts, expected {EDGE_ID_PARTS}",
                    parts.len()
                ))
            })?;
        let direction = Direction::from_code(&direction).ok_or_else(|| {
            InternalError::invalid_id(format!("edge id '{text}' has bad direction '{direction}'"))
        })?;

        Ok(Self {
            owner,
            direction,
            label,
            sort_values,
            other,
        })
    }

    /// The same edge seen from the other endpoint.
    #[must_use]
    pub fn switch_owner(&self) -> Self {
        Self {
            owner: self.other.clone(),
            direction: self.direction.opposite(),
            label: self.label.clone(),
            sort_values: self.sort_values.clone(),
            other: self.owner.clone(),
        }
    }

    /// Column key under which the edge lives inside its owner row.
    #[must_use]
    pub fn column(&self) -> String {
        concat(&[
            self.direction.code(),
            self.label.as_str(),
            self.sort_values.as_str(),
            self.other.as_str(),
        ])
    }

    #[must_use]
    pub fn to_id(&self) -> Id {
        Id::string(concat(&[
            self.owner.as_str(),
            self.direction.code(),
            self.label.as_str(),
            self.sort_values.as_str(),
            self.other.as_str(),
        ]))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_id())
    }
}

///
/// TESTS
///
