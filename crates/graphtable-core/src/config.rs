use crate::{error::InternalError, value::NumericKind};
use serde::{Deserialize, Serialize};

///
/// StoreConfig
///
/// Store-wide settings, read from a flat TOML document:
///
/// ```toml
/// limit = "zero_is_empty"
/// shard_kind = "int"
/// ```
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub limit: LimitConvention,
    pub shard_kind: NumericKind,
}

impl StoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, InternalError> {
        let config: Self = toml::from_str(raw)
            .map_err(|err| InternalError::config(format!("invalid store config: {err}")))?;
        tracing::debug!(limit = ?config.limit, shard_kind = ?config.shard_kind, "store config loaded");

        Ok(config)
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: LimitConvention) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_shard_kind(mut self, shard_kind: NumericKind) -> Self {
        self.shard_kind = shard_kind;
        self
    }
}

///
/// LimitConvention
///
/// How the store reads a caller's raw `limit`. Tables only ever see
/// `Option<u64>`, where `None` is unbounded and `Some(0)` is empty.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitConvention {
    #[default]
    ZeroIsUnbounded,
    ZeroIsEmpty,
}

impl LimitConvention {
    #[must_use]
    pub const fn resolve(self, raw: u64) -> Option<u64> {
        match (self, raw) {
            (Self::ZeroIsUnbounded, 0) => None,
            _ => Some(raw),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn empty_document_yields_defaults() {
        let config = StoreConfig::from_toml_str("").expect("empty config");

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.limit, LimitConvention::ZeroIsUnbounded);
        assert_eq!(config.shard_kind, NumericKind::Long);
    }

    #[test]
    fn fields_parse_in_snake_case() {
        let config = StoreConfig::from_toml_str("limit = \"zero_is_empty\"\nshard_kind = \"double\"\n")
            .expect("config");

        assert_eq!(config.limit, LimitConvention::ZeroIsEmpty);
        assert_eq!(config.shard_kind, NumericKind::Double);
    }

    #[test]
    fn unknown_keys_and_values_are_config_errors() {
        for raw in ["limits = \"zero_is_empty\"", "shard_kind = \"decimal\"", "limit = 3"] {
            let err = StoreConfig::from_toml_str(raw).expect_err(raw);
            assert_eq!(err.class, ErrorClass::Config, "{raw}");
        }
    }

    #[test]
    fn limit_conventions_differ_only_on_zero() {
        assert_eq!(LimitConvention::ZeroIsUnbounded.resolve(0), None);
        assert_eq!(LimitConvention::ZeroIsEmpty.resolve(0), Some(0));
        assert_eq!(LimitConvention::ZeroIsUnbounded.resolve(5), Some(5));
        assert_eq!(LimitConvention::ZeroIsEmpty.resolve(5), Some(5));
    }
}
