//! Configuration model for forksh.
//!
//! Config lives in a small YAML file. Parsing is forward compatible (unknown
//! fields are ignored), every field has a default, and values are validated
//! after parsing.

use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt printed before each line in interactive mode.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Permission bits for files created by output redirection, before umask.
    #[serde(default = "default_output_mode")]
    pub output_mode: u32,

    /// Append job events to this NDJSON file when set.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
}

fn default_prompt() -> String {
    "$ ".to_string()
}
fn default_output_mode() -> u32 {
    0o777
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            output_mode: default_output_mode(),
            event_log: None,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ShellError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| ShellError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve the config to use: an explicit path, else the user config file
    /// under `$XDG_CONFIG_HOME` if one exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate config values.
    ///
    /// - `output_mode` must fit in the permission and mode bits (`0o7777`)
    /// - `event_log`, when set, must not be an empty path
    pub fn validate(&self) -> Result<()> {
        if self.output_mode > 0o7777 {
            return Err(ShellError::Config(format!(
                "config validation failed: output_mode {:#o} exceeds 0o7777",
                self.output_mode
            )));
        }

        if self
            .event_log
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ShellError::Config(
                "config validation failed: event_log must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")?;
    Some(PathBuf::from(base).join("forksh").join("config.yaml"))
}
