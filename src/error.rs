//! Invocation-boundary error taxonomy.
//!
//! Service-call failures (a non-200 status) are not errors: they are
//! reported through [`crate::handler::Outcome`] and the invocation completes.

use thiserror::Error;

use crate::config::ConfigError;
use crate::event::DecodeError;
use crate::load_balancer::ServiceError;

/// Fatal failure of one invocation, surfaced to the invoking environment.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Envelope or alarm message missing required fields.
    #[error(transparent)]
    MalformedInput(#[from] DecodeError),

    /// Target group reference (or other configuration) unusable.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The load balancer call could not complete.
    #[error(transparent)]
    Unavailable(#[from] ServiceError),
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
