//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Target group reference present
//! - Service endpoint, when set, is a usable http(s) URL
//! - The `query_api` backend has an endpoint
//! - Timeouts are non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HandlerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is handed to the handler

use thiserror::Error;
use url::Url;

use crate::config::schema::{HandlerConfig, ServiceBackend};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target_group.arn must not be empty")]
    EmptyTargetGroup,

    #[error("service.endpoint is required when service.backend is query_api")]
    MissingEndpoint,

    #[error("service.endpoint '{endpoint}' is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("service.endpoint '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("service.api_version must not be empty")]
    EmptyApiVersion,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &HandlerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.target_group.arn.trim().is_empty() {
        errors.push(ValidationError::EmptyTargetGroup);
    }

    match config.service.endpoint.as_deref() {
        Some(endpoint) => match Url::parse(endpoint) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme(endpoint.to_string()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }),
        },
        None if config.service.backend == ServiceBackend::QueryApi => {
            errors.push(ValidationError::MissingEndpoint);
        }
        None => {}
    }

    if config.service.api_version.trim().is_empty() {
        errors.push(ValidationError::EmptyApiVersion);
    }
    if config.service.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("service.connect_timeout_secs"));
    }
    if config.service.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("service.request_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
