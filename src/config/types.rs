//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::filters::{FilterTarget, Polarity};

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Minimum level written to the log file
    pub log_level: String,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Filter stages, run in file order
    pub filters: Vec<FilterConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "debug".to_string(),
            log_path: default_log_path(),
            filters: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// One filter stage.
///
/// # Examples
///
/// ```toml
/// [[filters]]
/// target = "resource_name"
/// mode = "out"
/// values = ["Humidity", "Pressure"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Stage name for log lines (default: "<target>-<mode>")
    #[serde(default)]
    pub name: Option<String>,

    /// Event field the filter tests
    pub target: FilterTarget,

    /// "for" keeps matches, "out" drops them
    pub mode: Polarity,

    /// Match values; an empty list lets every event through
    #[serde(default)]
    pub values: Vec<String>,
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_dir)
        .join("logs")
}

/// `~/.config/event-filter`, or `./.config/event-filter` without a home directory.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("event-filter")
}
