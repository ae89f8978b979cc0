//! Target group wire types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target group reference (ARN).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetGroupArn(String);

impl TargetGroupArn {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TargetGroupArn {
    fn from(arn: String) -> Self {
        Self(arn)
    }
}

impl From<&str> for TargetGroupArn {
    fn from(arn: &str) -> Self {
        Self(arn.to_string())
    }
}

impl fmt::Display for TargetGroupArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Endpoint identifier (e.g., an instance id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EndpointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EndpointId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query API action names.
pub const DESCRIBE_TARGET_HEALTH: &str = "DescribeTargetHealth";
pub const DEREGISTER_TARGETS: &str = "DeregisterTargets";
pub const REGISTER_TARGETS: &str = "RegisterTargets";

/// Only an exact 200 counts as success.
pub fn is_success_status(status_code: u16) -> bool {
    status_code == 200
}

/// Split a non-success status into a reportable failure or a fatal credential rejection.
///
/// 401 and 403 mean the request was never evaluated, so they surface as
/// `ServiceError::Unauthorized`; every other status is returned as-is.
pub fn classify_status(action: &'static str, status_code: u16) -> ServiceResult<u16> {
    match status_code {
        401 | 403 => Err(ServiceError::Unauthorized {
            action,
            status: status_code,
        }),
        status => Ok(status),
    }
}

/// A target as sent to and returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetDescription {
    pub id: EndpointId,
}

impl TargetDescription {
    pub fn new(id: EndpointId) -> Self {
        Self { id }
    }
}

/// Health of one target as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetHealth {
    /// e.g. "healthy", "unhealthy", "draining", "unused".
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetHealthDescription {
    pub target: TargetDescription,
    #[serde(default)]
    pub health_check_port: Option<String>,
    pub target_health: TargetHealth,
}

/// Result of a `describe_target_health` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHealthReport {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub descriptions: Vec<TargetHealthDescription>,
}

/// Response metadata of a mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status_code: u16,
    pub request_id: Option<String>,
}

impl ServiceResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            request_id: None,
        }
    }
}

/// Errors where the call itself could not complete.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection, TLS, signing or protocol failure.
    #[error("Transport error calling {action}: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request did not complete within the configured timeout.
    #[error("{action} timed out after {secs} seconds")]
    Timeout { action: &'static str, secs: u64 },

    /// The service rejected the caller's credentials.
    #[error("{action} rejected with status {status}: credentials not accepted")]
    Unauthorized { action: &'static str, status: u16 },

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Service endpoint is unusable (bad URL, client build failure).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for target group operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
