//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use ecolens_domain::DataSource;
use ecolens_workflow::WorkflowConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Directory holding config, session and history
pub fn home_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    let home =
        dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".ecolens"))
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(skip)]
    dir: PathBuf,
}

/// Backend profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend base URL
    pub api_url: String,

    /// Data source used when the session has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration stored under `dir`.
    pub fn new_in(dir: impl Into<PathBuf>) -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "default".to_string(),
            Profile {
                api_url: "http://localhost:5000".to_string(),
                data_source: None,
            },
        );

        Self {
            active_profile: default_profile(),
            profiles,
            settings: Settings::default(),
            workflow: WorkflowConfig::default(),
            dir: dir.into(),
        }
    }

    /// Directory the configuration lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Configuration file path.
    pub fn path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    /// Session file path.
    pub fn session_path(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    /// REPL history file path.
    pub fn history_path(&self) -> PathBuf {
        self.dir.join("history.txt")
    }

    /// Load configuration from `dir` or create default.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("config.toml");

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&contents)?;
            config
                .workflow
                .validate()
                .map_err(CliError::Config)?;
            config.dir = dir.to_path_buf();
            Ok(config)
        } else {
            Ok(Self::new_in(dir))
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(self.path(), contents)?;
        Ok(())
    }

    /// Write the default file on first run.
    ///
    /// Failure is not fatal since the defaults still apply, so it is logged
    /// and returned as `false`.
    pub fn save_default(&self) -> bool {
        if self.path().exists() {
            return true;
        }
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not write default config to {}: {}", self.path().display(), e);
                false
            }
        }
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Workflow settings with the active profile's data source applied.
    pub fn workflow_for_active_profile(&self) -> Result<WorkflowConfig> {
        let profile = self.get_active_profile()?;
        let mut workflow = self.workflow.clone();
        if let Some(source) = profile.data_source {
            workflow.default_data_source = source;
        }
        Ok(workflow)
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}
