//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the handler.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::load_balancer::TargetGroupArn;

/// Root configuration for the transition handler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HandlerConfig {
    /// The target group this handler manages.
    pub target_group: TargetGroupConfig,

    /// Load balancer API endpoint and timeouts.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl HandlerConfig {
    /// Build a config for the given target group with every other section defaulted.
    pub fn for_target_group(arn: impl Into<String>) -> Self {
        Self {
            target_group: TargetGroupConfig { arn: arn.into() },
            ..Self::default()
        }
    }

    /// The validated target group reference.
    ///
    /// Only meaningful after `validate_config` has accepted this config.
    pub fn target_group_arn(&self) -> TargetGroupArn {
        TargetGroupArn::from(self.target_group.arn.clone())
    }
}

/// Target group configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TargetGroupConfig {
    /// Target group ARN. Required; usually supplied through `TARGET_GROUP_ARN`.
    pub arn: String,
}

/// Which client talks to the load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceBackend {
    /// Signed calls through the AWS SDK.
    #[default]
    Aws,
    /// Unsigned Query API calls to `endpoint` (emulators, signing gateways).
    QueryApi,
}

/// Load balancer service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub backend: ServiceBackend,

    /// Region for the AWS backend. Falls back to the SDK's region chain.
    pub region: Option<String>,

    /// Endpoint override. Required by `query_api`, optional for `aws`.
    pub endpoint: Option<String>,

    /// API version sent with every Query API action.
    pub api_version: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: ServiceBackend::Aws,
            region: None,
            endpoint: None,
            api_version: "2015-12-01".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            use_system_proxy: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
