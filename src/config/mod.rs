//! Configuration handling for host-probe.
//!
//! This module loads `probe.toml` (tool settings plus an optional default
//! checklist) and standalone checklist files in TOML or JSON.

use crate::acquire::DockerSettings;
use crate::core::error::{Error, Result};
use crate::tabular::TableOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "probe.toml";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the default checklist.
    pub name: String,
    /// Docker acquisition settings.
    pub docker: DockerConfig,
    /// Table parsing settings.
    pub tabular: TabularConfig,
    /// Default checklist entries.
    pub checks: Vec<CheckEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            docker: DockerConfig::default(),
            tabular: TabularConfig::default(),
            checks: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::find_config_file()?;
        Self::load_from(&path)
    }

    /// Loads configuration or returns defaults if not found.
    pub fn load_or_default() -> Result<Self> {
        match Self::find_config_file() {
            Ok(path) => Self::load_from(&path),
            Err(Error::ConfigNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io("read config", e))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config_parse_with_source("Failed to parse TOML", e))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Finds the configuration file by searching up the directory tree.
    pub fn find_config_file() -> Result<PathBuf> {
        let cwd = std::env::current_dir().map_err(|e| Error::io("get current dir", e))?;
        Self::find_config_file_from(&cwd)
    }

    /// Finds the configuration file by searching up from `start`.
    pub fn find_config_file_from(start: &Path) -> Result<PathBuf> {
        let mut current = start;
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::ConfigNotFound {
            path: start.join(CONFIG_FILE_NAME),
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if humantime::parse_duration(&self.docker.timeout).is_err() {
            return Err(Error::ConfigInvalid {
                field: "docker.timeout".to_string(),
                message: format!("Invalid duration: {}", self.docker.timeout),
            });
        }

        if self.docker.command.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                field: "docker.command".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        for (index, entry) in self.checks.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(Error::ConfigInvalid {
                    field: format!("checks[{index}].id"),
                    message: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Timeout for external commands and API calls. `0s` disables it.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        match humantime::parse_duration(&self.docker.timeout) {
            Ok(d) if d.is_zero() => None,
            Ok(d) => Some(d),
            Err(_) => {
                tracing::warn!(
                    timeout = %self.docker.timeout,
                    default_secs = DEFAULT_TIMEOUT_SECS,
                    "Invalid timeout format, using default"
                );
                Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            },
        }
    }

    /// Settings for the Docker sources.
    #[must_use]
    pub fn docker_settings(&self) -> DockerSettings {
        DockerSettings {
            command: self.docker.command.clone(),
            table: TableOptions {
                case_sensitive_headers: self.tabular.case_sensitive_headers,
            },
        }
    }

    /// The checklist embedded in this configuration.
    #[must_use]
    pub fn checklist(&self) -> Checklist {
        Checklist {
            name: self.name.clone(),
            checks: self.checks.clone(),
        }
    }

    /// Generates default configuration as a string.
    #[must_use]
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Docker acquisition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Program run for the text-scrape checks.
    pub command: String,
    /// Timeout for each external command or API call.
    pub timeout: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            command: "docker".to_string(),
            timeout: format!("{DEFAULT_TIMEOUT_SECS}s"),
        }
    }
}

/// Table parsing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularConfig {
    /// Match column headers exactly.
    pub case_sensitive_headers: bool,
}

/// One check invocation in a checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckEntry {
    /// Registered check name.
    #[serde(alias = "ID", alias = "Check")]
    pub id: String,
    /// Parameters passed to the check.
    #[serde(default, alias = "Parameters")]
    pub parameters: Vec<String>,
}

/// An ordered list of checks to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    /// Name shown in the summary.
    #[serde(default, alias = "Name")]
    pub name: String,
    /// Entries, run in order.
    #[serde(default, alias = "Checklist")]
    pub checks: Vec<CheckEntry>,
}

impl Checklist {
    /// Loads a checklist file. `.json` files are parsed as JSON, anything
    /// else as TOML. An unnamed checklist takes the file stem as its name.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io("read checklist", e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let mut checklist: Self = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| Error::config_parse_with_source("Failed to parse JSON checklist", e))?
        } else {
            toml::from_str(&content)
                .map_err(|e| Error::config_parse_with_source("Failed to parse TOML checklist", e))?
        };

        if checklist.name.is_empty() {
            checklist.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        tracing::debug!(
            path = %path.display(),
            checks = checklist.checks.len(),
            "Loaded checklist"
        );
        Ok(checklist)
    }
}
