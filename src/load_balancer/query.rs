//! Unsigned Query API client for local emulators and signing gateways.
//!
//! # Responsibilities
//! - Encode target group actions as form-encoded Query API requests
//! - Apply connect and request timeouts
//! - Surface the response status without judging it (except credential rejections)
//! - Decode the target health body when it is JSON

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::ServiceConfig;
use crate::load_balancer::types::{
    classify_status, is_success_status, ServiceError, ServiceResponse, ServiceResult,
    TargetDescription, TargetGroupArn, TargetHealthDescription, TargetHealthReport,
    DEREGISTER_TARGETS, DESCRIBE_TARGET_HEALTH, REGISTER_TARGETS,
};
use crate::load_balancer::TargetGroupService;

/// HTTP client for an unsigned target group Query API endpoint.
#[derive(Clone)]
pub struct QueryApiClient {
    client: Client,
    endpoint: Url,
    api_version: String,
    request_timeout_secs: u64,
}

impl QueryApiClient {
    /// Create a new client from the service configuration.
    ///
    /// Requires `service.endpoint`; there is no default host for unsigned requests.
    pub fn new(config: &ServiceConfig) -> ServiceResult<Self> {
        let raw = config.endpoint.as_deref().ok_or_else(|| {
            ServiceError::Unavailable("query_api backend requires service.endpoint".to_string())
        })?;
        let endpoint: Url = raw.parse().map_err(|e| {
            ServiceError::Unavailable(format!("Invalid endpoint '{}': {}", raw, e))
        })?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("alarm-target-handler/", env!("CARGO_PKG_VERSION")));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("HTTP client build failed: {}", e)))?;

        tracing::debug!(
            endpoint = %endpoint,
            api_version = %config.api_version,
            request_timeout_secs = config.request_timeout_secs,
            "Load balancer client initialized"
        );

        Ok(Self {
            client,
            endpoint,
            api_version: config.api_version.clone(),
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    /// Send one action and return the status code and raw body.
    async fn send(
        &self,
        action: &'static str,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<(u16, String)> {
        let params = action_params(action, &self.api_version, target_group, targets);

        tracing::debug!(action, target_group = %target_group, targets = targets.len(), "Calling load balancer");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(&params)
            .send()
            .await
            .map_err(|e| self.classify(action, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(action, e))?;

        tracing::debug!(action, status, "Load balancer responded");
        Ok((classify_status(action, status)?, body))
    }

    fn classify(&self, action: &'static str, error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::Timeout {
                action,
                secs: self.request_timeout_secs,
            }
        } else {
            ServiceError::Transport {
                action,
                source: Box::new(error),
            }
        }
    }

    async fn mutate(
        &self,
        action: &'static str,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<ServiceResponse> {
        let (status_code, body) = self.send(action, target_group, targets).await?;
        Ok(ServiceResponse {
            status_code,
            request_id: request_id(action, &body),
        })
    }
}

impl TargetGroupService for QueryApiClient {
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<TargetHealthReport> {
        let (status_code, body) = self
            .send(DESCRIBE_TARGET_HEALTH, target_group, targets)
            .await?;

        let mut report = TargetHealthReport {
            status_code,
            request_id: request_id(DESCRIBE_TARGET_HEALTH, &body),
            descriptions: Vec::new(),
        };
        if !is_success_status(status_code) {
            return Ok(report);
        }

        // An unreadable body leaves the report empty; it never blocks the caller.
        match serde_json::from_str::<DescribeEnvelope>(&body) {
            Ok(envelope) => {
                report.descriptions = envelope.response.result.target_health_descriptions;
            }
            Err(e) => {
                tracing::warn!(
                    action = DESCRIBE_TARGET_HEALTH,
                    error = %e,
                    "Could not decode target health body"
                );
            }
        }

        Ok(report)
    }

    async fn deregister_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<ServiceResponse> {
        self.mutate(DEREGISTER_TARGETS, target_group, targets).await
    }

    async fn register_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<ServiceResponse> {
        self.mutate(REGISTER_TARGETS, target_group, targets).await
    }
}

impl std::fmt::Debug for QueryApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryApiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Build the form parameters for one Query API action.
pub fn action_params(
    action: &str,
    api_version: &str,
    target_group: &TargetGroupArn,
    targets: &[TargetDescription],
) -> Vec<(String, String)> {
    let mut params = vec![
        ("Action".to_string(), action.to_string()),
        ("Version".to_string(), api_version.to_string()),
        ("TargetGroupArn".to_string(), target_group.to_string()),
    ];

    // Query API lists are 1-indexed
    for (i, target) in targets.iter().enumerate() {
        params.push((format!("Targets.member.{}.Id", i + 1), target.id.to_string()));
    }

    params
}

/// Pull `<Action>Response.ResponseMetadata.RequestId` out of a JSON body, if any.
fn request_id(action: &str, body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get(format!("{}Response", action))?
        .get("ResponseMetadata")?
        .get("RequestId")?
        .as_str()
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct DescribeEnvelope {
    #[serde(rename = "DescribeTargetHealthResponse")]
    response: DescribeResponse,
}

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    #[serde(rename = "DescribeTargetHealthResult")]
    result: DescribeResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeResult {
    #[serde(default)]
    target_health_descriptions: Vec<TargetHealthDescription>,
}
