//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_fragments(config)?;
    validate_changelog(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_fragments(config: &Config) -> Result<()> {
    if config.fragments.dir.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "fragments.dir".to_string(),
            message: "directory cannot be empty".to_string(),
        }
        .into());
    }

    if config.fragments.patterns.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "fragments.patterns".to_string(),
            message: "at least one pattern is required".to_string(),
        }
        .into());
    }

    for (i, pattern) in config.fragments.patterns.iter().enumerate() {
        if let Err(e) = glob::Pattern::new(pattern) {
            return Err(ConfigError::InvalidValue {
                field: format!("fragments.patterns[{}]", i),
                message: e.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.file.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.file".to_string(),
            message: "file cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}
