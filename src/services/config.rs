//! Engine configuration: the names synthesized elements receive and a flat
//! string store consulted for per-operator settings.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Read-only key/value lookup available to schema inference.
pub trait ConfigurationManager: Send + Sync {
    fn get_string_value(&self, key: &str) -> Option<String>;
}

/// Key under which a user-defined operator would register its schema rule.
pub fn operator_schema_key(operator: &str) -> String {
    format!("operator.{operator}.schema_infer")
}

/// Names given to elements that inference creates rather than copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventions {
    /// Dimension created when Select flattens or Aggregate has no group-by.
    pub synthetic_dimension: String,
    pub mask_attribute: String,
    pub offset_attribute: String,
    /// Attribute name for an Arithmetic result without `newMember`.
    pub arithmetic_result: String,
    pub left_prefix: String,
    pub right_prefix: String,
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self {
            synthetic_dimension: "i".to_string(),
            mask_attribute: "mask".to_string(),
            offset_attribute: "offset".to_string(),
            arithmetic_result: "op_result".to_string(),
            left_prefix: "left_".to_string(),
            right_prefix: "right_".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The full engine configuration, loadable from JSON. Missing fields take
/// their defaults, so `{}` is a valid document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub conventions: NamingConventions,
    pub values: BTreeMap<String, String>,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn set_string_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigurationManager for EngineConfig {
    fn get_string_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}
