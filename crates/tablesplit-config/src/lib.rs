// tablesplit-config - Declarative configuration for batch splitting
//
// A config file defines named batches, each pinning a table and a
// partitioner (one of the splitting strategies with its parameters), and
// optionally the warehouse datasource the tables live in. Loading is
// explicit from a TOML path; validation catches unusable definitions
// before any data is read.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod connection;
mod partitioner;
mod validation;

pub use connection::{ConnectionDetails, DatasourceConfig, WarehouseConnection};
pub use partitioner::Partitioner;

/// Root of a tablesplit configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceConfig>,

    #[serde(default)]
    pub batches: Vec<BatchDefinition>,
}

/// One named batch: a table plus the partitioner selecting its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDefinition {
    pub name: String,
    pub table: String,
    pub partitioner: Partitioner,
}

impl SplitConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SplitConfig =
            toml::from_str(raw).context("failed to parse configuration")?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Look up a batch definition by name.
    pub fn batch(&self, name: &str) -> Option<&BatchDefinition> {
        self.batches.iter().find(|batch| batch.name == name)
    }
}
