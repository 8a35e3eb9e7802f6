//! Configuration validation.

use anyhow::{bail, Result};

use super::Config;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if config.log_level.parse::<tracing::Level>().is_err() {
        bail!(
            "Invalid log_level '{}': expected one of trace, debug, info, warn, error",
            config.log_level
        );
    }

    for (i, filter) in config.filters.iter().enumerate() {
        if filter.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            bail!("filters[{}]: name cannot be empty", i);
        }

        // An empty list is a passthrough, but an empty value can never match.
        for (j, value) in filter.values.iter().enumerate() {
            if value.is_empty() {
                bail!("filters[{}]: values[{}] cannot be empty", i, j);
            }
        }
    }

    Ok(())
}
