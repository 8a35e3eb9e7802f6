//! Configuration service for loading and generating config files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::{default_config_dir, default_log_path_for_config_dir};
use super::Config;

/// Configuration service.
pub struct ConfigService;

impl ConfigService {
    /// Get the default configuration file path (~/.config/event-filter/config.toml).
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.toml")
    }

    /// Load configuration from file.
    ///
    /// If `path` is `None`, uses the default path. A missing file is created
    /// with the default content first. Unless set in the file, logs go to a
    /// `logs` directory next to the config file.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if !path.exists() {
            Self::generate_at(&path)?;
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, path.parent())
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Parse and validate configuration content.
    pub fn parse(content: &str, config_dir: Option<&Path>) -> Result<Config> {
        let table: toml::Table = toml::from_str(content).context("Failed to parse TOML")?;
        let log_path_set = table.contains_key("log_path");

        let mut config: Config = toml::Value::Table(table)
            .try_into()
            .context("Failed to parse configuration")?;
        if !log_path_set {
            config.log_path = default_log_path_for_config_dir(config_dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Generate default configuration file at the specified path.
    pub fn generate_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, Self::default_config_content())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Generate default configuration content with comments.
    fn default_config_content() -> &'static str {
        r#"# event-filter configuration file

# Enable debug logging to file (default: false)
debug = false

# Minimum log level: trace, debug, info, warn, error (default: "debug")
log_level = "debug"

# Path to log directory (default: same directory as config.toml/logs)
# log_path = "~/.config/event-filter/logs"

# Filter stages run in the order listed. The first stage that filters the
# event out stops the pipeline.
#
# target: profile_name | device_name | source_name | resource_name
# mode:   "for" keeps only matching values, "out" drops them
# values: match values; an empty list lets every event through
#
# resource_name filters drop non-matching readings and stop the pipeline
# only when no reading is left.

# [[filters]]
# name = "thermostats"
# target = "profile_name"
# mode = "for"
# values = ["Thermostat-Profile"]

# [[filters]]
# target = "resource_name"
# mode = "out"
# values = ["Uptime", "FirmwareVersion"]
"#
    }
}
