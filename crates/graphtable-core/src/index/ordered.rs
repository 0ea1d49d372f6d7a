//! Order-preserving fixed-width encodings for numeric index components.
//!
//! Big-endian bytes of every encoding compare in the same order as the
//! numbers they encode, so sorted tables can navigate numeric ranges by
//! plain byte comparison.

use crate::value::{FieldValue, NumericKind};

/// Ordered encoding of `value` as a `kind` number, `kind.width()` bytes
/// long. `None` when the value does not coerce to `kind`.
pub(crate) fn ordered_number_bytes(value: &FieldValue, kind: NumericKind) -> Option<Vec<u8>> {
    let bytes = match value.coerce(kind)? {
        FieldValue::Int(v) => ordered_i32_bytes(v).to_vec(),
        FieldValue::Long(v) => ordered_i64_bytes(v).to_vec(),
        FieldValue::Float(v) => ordered_f32_bytes(v).to_vec(),
        FieldValue::Double(v) => ordered_f64_bytes(v).to_vec(),
        FieldValue::Text(_) => return None,
    };

    Some(bytes)
}

const fn ordered_i32_bytes(value: i32) -> [u8; 4] {
    let biased = value.cast_unsigned() ^ (1u32 << 31);
    biased.to_be_bytes()
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

// Zero drops its sign first: `-0.0` and `0.0` are one key.
const fn ordered_f32_bytes(value: f32) -> [u8; 4] {
    let mut bits = value.to_bits();
    if bits & 0x7FFF_FFFF == 0 {
        bits = 0;
    }
    let ordered = if bits & 0x8000_0000 == 0 {
        bits ^ 0x8000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let mut bits = value.to_bits();
    if bits & 0x7FFF_FFFF_FFFF_FFFF == 0 {
        bits = 0;
    }
    let ordered = if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(value: FieldValue) -> Vec<u8> {
        let kind = match value {
            FieldValue::Int(_) => NumericKind::Int,
            FieldValue::Float(_) => NumericKind::Float,
            FieldValue::Double(_) => NumericKind::Double,
            _ => NumericKind::Long,
        };

        ordered_number_bytes(&value, kind).expect("numeric encoding")
    }

    #[test]
    fn text_has_no_numeric_encoding() {
        assert_eq!(ordered_number_bytes(&FieldValue::from("1"), NumericKind::Int), None);
        assert_eq!(ordered_number_bytes(&FieldValue::Double(1.5), NumericKind::Long), None);
    }

    #[test]
    fn encodings_are_kind_width() {
        for kind in [NumericKind::Int, NumericKind::Long, NumericKind::Float, NumericKind::Double] {
            let bytes = ordered_number_bytes(&FieldValue::Int(-7), kind).expect("int coerces");
            assert_eq!(bytes.len(), kind.width(), "{kind:?}");
        }
    }

    #[test]
    fn signed_zero_is_one_key() {
        assert_eq!(encode(FieldValue::Float(-0.0)), encode(FieldValue::Float(0.0)));
        assert_eq!(encode(FieldValue::Double(-0.0)), encode(FieldValue::Double(0.0)));
        assert!(encode(FieldValue::Double(-f64::MIN_POSITIVE)) < encode(FieldValue::Double(-0.0)));
        assert!(encode(FieldValue::Double(-0.0)) < encode(FieldValue::Double(f64::MIN_POSITIVE)));
    }

    #[test]
    fn negative_floats_sort_below_positive() {
        assert!(encode(FieldValue::Float(-2.5)) < encode(FieldValue::Float(-1.0)));
        assert!(encode(FieldValue::Float(-1.0)) < encode(FieldValue::Float(0.0)));
        assert!(encode(FieldValue::Float(-f32::MAX)) < encode(FieldValue::Float(-1.0e30)));
    }

    proptest! {
        #[test]
        fn i64_encoding_preserves_order(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(
                encode(FieldValue::Long(a)).cmp(&encode(FieldValue::Long(b))),
                a.cmp(&b)
            );
        }

        #[test]
        fn i32_encoding_preserves_order(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(
                encode(FieldValue::Int(a)).cmp(&encode(FieldValue::Int(b))),
                a.cmp(&b)
            );
        }

        #[test]
        fn f64_encoding_preserves_order(
            a in -1.0e300f64..1.0e300,
            b in -1.0e300f64..1.0e300,
        ) {
            let expected = a.partial_cmp(&b).expect("finite values compare");
            prop_assert_eq!(encode(FieldValue::Double(a)).cmp(&encode(FieldValue::Double(b))), expected);
        }
    }
}
