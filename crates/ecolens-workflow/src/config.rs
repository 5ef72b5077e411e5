//! Configuration for the workflow

use ecolens_domain::DataSource;
use serde::{Deserialize, Serialize};

/// Workflow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Request gap-filling when analysis reports missing fields
    pub gap_fill_enabled: bool,

    /// Maximum free-text input length (characters)
    pub max_text_length: usize,

    /// Data source used when the session has none
    pub default_data_source: DataSource,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            gap_fill_enabled: true,
            max_text_length: 5_000,
            default_data_source: DataSource::Builtin,
        }
    }
}

impl WorkflowConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
