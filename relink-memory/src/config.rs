//! In-memory data source configuration.
//!
//! ```toml
//! name = "db"
//! id_type = "objectid"
//!
//! [debug]
//! log_queries = true
//!
//! [environments.test]
//! id_type = "number"
//! ```
//!
//! Values may reference environment variables as `${NAME}`.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MemoryError, MemoryResult};

/// How the connector generates ids for records created without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    /// Sequential integers starting at 1, per collection.
    #[default]
    Number,
    /// BSON object ids, as a MongoDB connector would assign.
    #[serde(alias = "objectId", alias = "object_id")]
    ObjectId,
    /// Random v4 UUIDs.
    Uuid,
}

impl FromStr for IdType {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "number" => Ok(Self::Number),
            "objectid" | "object_id" => Ok(Self::ObjectId),
            "uuid" => Ok(Self::Uuid),
            other => Err(MemoryError::config(format!("unknown id type `{}`", other))),
        }
    }
}

/// Debug settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log every query the data source serves.
    pub log_queries: bool,
}

/// Overrides applied by [`MemoryConfig::with_environment`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentOverride {
    /// Override the data source name.
    pub name: Option<String>,
    /// Override the id type.
    pub id_type: Option<IdType>,
    /// Override debug settings.
    pub debug: Option<DebugOverride>,
}

/// Debug overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOverride {
    /// Override query logging.
    pub log_queries: Option<bool>,
}

/// Configuration of a [`MemoryDataSource`](crate::MemoryDataSource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Data source name.
    pub name: String,
    /// Id generation strategy.
    pub id_type: IdType,
    /// Debug settings.
    pub debug: DebugConfig,
    /// Per-environment overrides.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub environments: HashMap<String, EnvironmentOverride>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            name: "memory".to_string(),
            id_type: IdType::default(),
            debug: DebugConfig::default(),
            environments: HashMap::new(),
        }
    }
}

impl MemoryConfig {
    /// Create a configuration with the given name and defaults otherwise.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the id type.
    pub fn id_type(mut self, id_type: IdType) -> Self {
        self.id_type = id_type;
        self
    }

    /// Enable or disable query logging.
    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.debug.log_queries = enabled;
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> MemoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MemoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        content.parse()
    }

    /// Apply the overrides of an environment, if it is defined.
    pub fn with_environment(mut self, env: &str) -> Self {
        if let Some(overrides) = self.environments.remove(env) {
            if let Some(name) = overrides.name {
                self.name = name;
            }
            if let Some(id_type) = overrides.id_type {
                self.id_type = id_type;
            }
            if let Some(log_queries) = overrides.debug.and_then(|d| d.log_queries) {
                self.debug.log_queries = log_queries;
            }
        }
        self
    }
}

impl FromStr for MemoryConfig {
    type Err = MemoryError;

    /// Parse configuration from a TOML string.
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let expanded = expand_env_vars(content)?;
        Ok(toml::from_str(&expanded)?)
    }
}

/// Replace `${NAME}` with the value of the environment variable `NAME`.
///
/// Unset variables are left as written.
fn expand_env_vars(content: &str) -> MemoryResult<String> {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| MemoryError::config(e.to_string()))?;

    Ok(re
        .replace_all(content, |caps: &regex_lite::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}
