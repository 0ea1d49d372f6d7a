//! Identifiers: opaque ordered ids plus the splicing and edge-id helpers
//! that compose them.

mod edge;
mod splice;

pub use edge::{Direction, EDGE_ID_PARTS, EdgeId};
pub use splice::{ESCAPE, SPLITOR, concat, split, splice_prefix};

use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Id
///
/// Opaque, totally ordered identifier. Ordering is the lexicographic order
/// of the serialized bytes, which is what sorted tables navigate over.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Id(Vec<u8>);

impl Id {
    /// Build an id from its text form.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self(value.into().into_bytes())
    }

    /// Build an id from a number rendered as decimal text.
    #[must_use]
    pub fn number(value: i64) -> Self {
        Self::string(value.to_string())
    }

    /// Build an id from raw serialized bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Text form of the id, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => f.write_str(text),
            Err(_) => self.0.iter().try_for_each(|b| write!(f, "{b:02x}")),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_by_serialized_bytes() {
        assert!(Id::string("a") < Id::string("b"));
        assert!(Id::string("ab") > Id::string("a"));
        assert!(Id::number(10) < Id::number(9));
    }

    #[test]
    fn display_renders_binary_ids_as_hex() {
        assert_eq!(Id::string("v1").to_string(), "v1");
        assert_eq!(Id::from_bytes(vec![0x00, 0xff]).to_string(), "00ff");
    }
}
