//! Configuration file support
//!
//! Every field is optional; command-line flags win over the file.

use crate::error::{CliError, CliResult};
use anyhow::Context;
use divvy_core::{preset, CoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Partitioning configuration
    #[serde(default)]
    pub partition: PartitionConfig,

    /// Additional named patterns, usable like the built-in presets
    #[serde(default)]
    pub presets: BTreeMap<String, String>,
}

/// Partitioning-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PartitionConfig {
    /// Number of workers
    pub workers: Option<usize>,

    /// Slack margin in bytes
    pub slack_margin: Option<usize>,

    /// Per-exchange deadline in milliseconds
    pub timeout_ms: Option<u64>,
}

impl CliConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> CliResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), CliError> {
        for (name, pattern) in &self.presets {
            let valid_name = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid_name {
                return Err(CliError::ConfigError(format!(
                    "preset name '{name}' may only contain letters, digits, '-' and '_'"
                )));
            }
            if pattern.is_empty() {
                return Err(CliError::ConfigError(format!(
                    "preset '{name}' has an empty pattern"
                )));
            }
            if preset::is_preset(name) {
                log::info!("config preset '{name}' overrides the built-in preset");
            }
        }
        Ok(())
    }

    /// Pattern registered under `name`, from this file or the built-in presets
    pub fn preset_pattern(&self, name: &str) -> Result<String, CoreError> {
        match self.presets.get(name) {
            Some(pattern) => Ok(pattern.clone()),
            None => preset::lookup(name).map(|preset| preset.pattern.to_string()),
        }
    }

    /// Names of every preset available with this configuration
    pub fn preset_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = preset::PRESETS.iter().map(|preset| preset.name).collect();
        names.extend(self.presets.keys().map(String::as_str));
        names.sort_unstable();
        names.dedup();
        names
    }
}
