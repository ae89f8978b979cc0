//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HandlerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the target group reference.
pub const TARGET_GROUP_ENV: &str = "TARGET_GROUP_ARN";
/// Environment variable overriding `service.endpoint`.
pub const ENDPOINT_ENV: &str = "ELB_ENDPOINT";
/// Environment variable overriding `observability.log_level`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<HandlerConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<HandlerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => HandlerConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);

    if config.target_group.arn.trim().is_empty() {
        return Err(ConfigError::Missing(TARGET_GROUP_ENV));
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut HandlerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(arn) = lookup(TARGET_GROUP_ENV) {
        config.target_group.arn = arn;
    }
    if let Some(endpoint) = lookup(ENDPOINT_ENV) {
        config.service.endpoint = Some(endpoint);
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        config.observability.log_level = level;
    }
}
