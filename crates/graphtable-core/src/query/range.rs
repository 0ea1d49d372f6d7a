use crate::{
    error::{ErrorOrigin, InternalError},
    query::{Condition, RelationKind},
    value::FieldValue,
};

///
/// RangeConditions
///
/// Normalized shape of the value relations of a range index query: an
/// optional equality key or an optional lower and upper bound, each with
/// its own inclusive flag.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeConditions {
    key_eq: Option<FieldValue>,
    key_min: Option<FieldValue>,
    key_min_eq: bool,
    key_max: Option<FieldValue>,
    key_max_eq: bool,
}

impl RangeConditions {
    /// Normalize relations; a repeated bound or equality is rejected.
    pub fn new<'a>(
        relations: impl IntoIterator<Item = &'a Condition>,
    ) -> Result<Self, InternalError> {
        let mut range = Self::default();

        for relation in relations {
            let value = relation.value.clone();
            let slot = match relation.relation {
                RelationKind::Eq => &mut range.key_eq,
                RelationKind::Gt | RelationKind::Gte => {
                    range.key_min_eq = relation.relation == RelationKind::Gte;
                    &mut range.key_min
                }
                RelationKind::Lt | RelationKind::Lte => {
                    range.key_max_eq = relation.relation == RelationKind::Lte;
                    &mut range.key_max
                }
            };
            if slot.replace(value).is_some() {
                return Err(InternalError::query_shape(
                    ErrorOrigin::Index,
                    format!("range index query has a conflicting relation: {relation}"),
                ));
            }
        }

        Ok(range)
    }

    #[must_use]
    pub const fn key_eq(&self) -> Option<&FieldValue> {
        self.key_eq.as_ref()
    }

    #[must_use]
    pub const fn key_min(&self) -> Option<&FieldValue> {
        self.key_min.as_ref()
    }

    #[must_use]
    pub const fn key_min_eq(&self) -> bool {
        self.key_min_eq
    }

    #[must_use]
    pub const fn key_max(&self) -> Option<&FieldValue> {
        self.key_max.as_ref()
    }

    #[must_use]
    pub const fn key_max_eq(&self) -> bool {
        self.key_max_eq
    }
}

///
/// TESTS
///
