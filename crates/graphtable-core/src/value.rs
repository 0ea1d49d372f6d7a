use crate::{
    error::{ErrorOrigin, InternalError},
    index::IndexLabelId,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// NumericKind
///
/// Declared numeric type of a range-indexed field. Decides the encoded
/// width of composite ids and the sentinel used for an absent bound.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Int,
    Float,
    #[default]
    Long,
    Double,
}

impl NumericKind {
    /// Smallest value of the kind, used as the sentinel for open bounds.
    #[must_use]
    pub const fn min_value(self) -> FieldValue {
        match self {
            Self::Int => FieldValue::Int(i32::MIN),
            Self::Float => FieldValue::Float(-f32::MAX),
            Self::Long => FieldValue::Long(i64::MIN),
            Self::Double => FieldValue::Double(-f64::MAX),
        }
    }

    /// Encoded byte width of one value of this kind.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }
}

///
/// FieldValue
///
/// Scalar carried by query conditions and used to build index ids.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum FieldValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Text(_) => "text",
        }
    }

    /// Text form used for string index ids and column comparisons.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            other => other.to_string(),
        }
    }

    /// Convert a numeric value to the given kind.
    ///
    /// Integers widen into any kind; floating values only convert to
    /// floating kinds. Text never coerces.
    #[must_use]
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn coerce(&self, kind: NumericKind) -> Option<Self> {
        let value = match (self, kind) {
            (Self::Int(v), NumericKind::Int) => Self::Int(*v),
            (Self::Long(v), NumericKind::Int) => Self::Int(i32::try_from(*v).ok()?),
            (Self::Int(v), NumericKind::Long) => Self::Long(i64::from(*v)),
            (Self::Long(v), NumericKind::Long) => Self::Long(*v),
            (Self::Int(v), NumericKind::Float) => Self::Float(*v as f32),
            (Self::Long(v), NumericKind::Float) => Self::Float(*v as f32),
            (Self::Float(v), NumericKind::Float) => Self::Float(*v),
            (Self::Double(v), NumericKind::Float) => Self::Float(*v as f32),
            (Self::Int(v), NumericKind::Double) => Self::Double(f64::from(*v)),
            (Self::Long(v), NumericKind::Double) => Self::Double(*v as f64),
            (Self::Float(v), NumericKind::Double) => Self::Double(f64::from(*v)),
            (Self::Double(v), NumericKind::Double) => Self::Double(*v),
            _ => return None,
        };

        Some(value)
    }

    /// Side of `kind`'s representable range a number lies beyond, or
    /// `None` when it fits or is not a number.
    #[must_use]
    pub fn overflows(&self, kind: NumericKind) -> Option<Ordering> {
        let (below, above) = match (self, kind) {
            (Self::Long(v), NumericKind::Int) => {
                (*v < i64::from(i32::MIN), *v > i64::from(i32::MAX))
            }
            (Self::Double(v), NumericKind::Float) => {
                (*v < -f64::from(f32::MAX), *v > f64::from(f32::MAX))
            }
            _ => return None,
        };

        match (below, above) {
            (true, _) => Some(Ordering::Less),
            (_, true) => Some(Ordering::Greater),
            _ => None,
        }
    }

    /// Interpret the value as an index label id.
    pub fn as_index_label(&self) -> Result<IndexLabelId, InternalError> {
        let id = match self {
            Self::Int(v) => u32::try_from(*v).ok(),
            Self::Long(v) => u32::try_from(*v).ok(),
            Self::Text(v) => v.parse::<u32>().ok(),
            Self::Float(_) | Self::Double(_) => None,
        };

        id.map(IndexLabelId::new).ok_or_else(|| {
            InternalError::query_shape(
                ErrorOrigin::Query,
                format!("index label id must be a non-negative integer, got {self}"),
            )
        })
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<IndexLabelId> for FieldValue {
    fn from(value: IndexLabelId) -> Self {
        Self::Long(i64::from(value.get()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_value_matches_declared_kind() {
        assert_eq!(NumericKind::Int.min_value(), FieldValue::Int(i32::MIN));
        assert_eq!(NumericKind::Double.min_value(), FieldValue::Double(-f64::MAX));
        assert_eq!(NumericKind::Float.width(), 4);
        assert_eq!(NumericKind::Long.width(), 8);
    }

    #[test]
    fn coerce_widens_integers_and_refuses_text() {
        assert_eq!(FieldValue::Int(3).coerce(NumericKind::Long), Some(FieldValue::Long(3)));
        assert_eq!(FieldValue::Long(i64::MAX).coerce(NumericKind::Int), None);
        assert_eq!(FieldValue::Double(1.5).coerce(NumericKind::Long), None);
        assert_eq!(FieldValue::from("7").coerce(NumericKind::Int), None);
    }

    #[test]
    fn overflows_reports_the_side_beyond_the_kind() {
        assert_eq!(FieldValue::Long(5_000_000_000).overflows(NumericKind::Int), Some(Ordering::Greater));
        assert_eq!(FieldValue::Long(-5_000_000_000).overflows(NumericKind::Int), Some(Ordering::Less));
        assert_eq!(FieldValue::Long(i64::from(i32::MAX)).overflows(NumericKind::Int), None);
        assert_eq!(FieldValue::Double(1.0e300).overflows(NumericKind::Float), Some(Ordering::Greater));
        assert_eq!(FieldValue::Double(-1.0e300).overflows(NumericKind::Float), Some(Ordering::Less));
        assert_eq!(FieldValue::Long(i64::MAX).overflows(NumericKind::Long), None);
    }

    #[test]
    fn as_index_label_accepts_integer_forms() {
        assert_eq!(FieldValue::Long(7).as_index_label().map(IndexLabelId::get), Ok(7));
        assert_eq!(FieldValue::from("12").as_index_label().map(IndexLabelId::get), Ok(12));
        assert!(FieldValue::Int(-1).as_index_label().is_err());
    }
}
