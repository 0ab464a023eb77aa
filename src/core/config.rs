//! Configuration - user-level and project-level YAML settings
//!
//! Settings are layered: the user config (`<config dir>/rams/config.yaml`)
//! is read first, then `.rams/config.yaml` in the working directory
//! overrides it key by key. Command-line flags and environment variables
//! are applied on top by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::{parse_yaml_file, YamlError};

/// Default session file name, relative to the working directory
pub const DEFAULT_SESSION_FILE: &str = "rams.session.yaml";

/// Default tracing filter
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Project config location, relative to the working directory
pub const PROJECT_CONFIG: &str = ".rams/config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config file {}: {source}", .path.display())]
    Invalid { path: PathBuf, source: YamlError },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of knowledge base YAML files replacing the embedded default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,

    /// Tracing filter, e.g. "info" or "rams=debug"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Default "prepared by" for new sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Config {
    /// Load user then project config for the given working directory
    pub fn load(working_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_from(Self::global_path().as_deref(), working_dir)
    }

    /// Load with an explicit user config path (for tests)
    pub fn load_from(global: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(path) = global {
            config.merge(read_optional(path)?);
        }
        config.merge(read_optional(&working_dir.join(PROJECT_CONFIG))?);
        Ok(config)
    }

    /// User-level config file path
    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("uk", "rams", "rams")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Overlay set keys from `other`
    pub fn merge(&mut self, other: Config) {
        if other.knowledge_base.is_some() {
            self.knowledge_base = other.knowledge_base;
        }
        if other.session_file.is_some() {
            self.session_file = other.session_file;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.author.is_some() {
            self.author = other.author;
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

fn read_optional(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Ok(Config::default());
    }
    parse_yaml_file(path).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}
