//! Configuration validation

use globset::Glob;
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_discovery(config)?;
    validate_execution(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_discovery(config: &Config) -> Result<()> {
    if config.discovery.patterns.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "discovery.patterns".to_string(),
            message: "at least one pattern is required".to_string(),
        }
        .into());
    }

    for pattern in &config.discovery.patterns {
        if let Err(e) = Glob::new(pattern) {
            return Err(ConfigError::InvalidValue {
                field: "discovery.patterns".to_string(),
                message: format!("'{}' is not a valid glob: {}", pattern, e.kind()),
            }
            .into());
        }
    }

    for pattern in config.discovery.exclude.iter().filter(|p| p.contains('*')) {
        if let Err(e) = Glob::new(pattern) {
            return Err(ConfigError::InvalidValue {
                field: "discovery.exclude".to_string(),
                message: format!("'{}' is not a valid glob: {}", pattern, e.kind()),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_execution(config: &Config) -> Result<()> {
    if config.execution.command.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "execution.command".to_string(),
            message: "command cannot be empty".to_string(),
        }
        .into());
    }

    let timeout = config.execution.timeout;
    if !timeout.is_finite() || timeout <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "execution.timeout".to_string(),
            message: "must be a positive number of seconds".to_string(),
        }
        .into());
    }

    Ok(())
}
