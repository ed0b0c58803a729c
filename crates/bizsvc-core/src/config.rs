//! Wiring configuration (TOML).
//!
//! ```toml
//! expect = ["query-warning", "defect-operate"]
//!
//! [categories."defect-operate"]
//! fallback = "exact-only"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::policy::FallbackPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read wiring config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid wiring config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WiringConfig {
    /// Categories that must have at least one implementation at startup.
    #[serde(default)]
    pub expect: Vec<String>,

    #[serde(default)]
    pub categories: BTreeMap<String, CategoryConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl WiringConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policies_and_expectations() {
        let config = WiringConfig::from_toml_str(
            r#"
            expect = ["query-warning", "batch-process:IGNORE"]

            [categories."defect-operate"]
            fallback = "exact-only"

            [categories."query-warning"]
            "#,
        )
        .unwrap();

        assert_eq!(config.expect.len(), 2);
        assert_eq!(
            config.categories["defect-operate"].fallback,
            FallbackPolicy::ExactOnly
        );
        assert_eq!(
            config.categories["query-warning"].fallback,
            FallbackPolicy::ToDefault
        );
    }

    #[test]
    fn empty_config_is_valid() {
        assert_eq!(WiringConfig::from_toml_str("").unwrap(), WiringConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = WiringConfig::from_toml_str("expected = []").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = WiringConfig::from_toml_str(
            r#"
            [categories."query-warning"]
            fallback = "sometimes"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WiringConfig::load("/nonexistent/bizsvc/wiring.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bizsvc/wiring.toml"));
    }
}
