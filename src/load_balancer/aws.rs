//! Target group service over the AWS SDK.
//!
//! Requests are signed with credentials from the default provider chain.
//! Retries are disabled; a failed call is reported once and never repeated.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_elasticloadbalancingv2::config::http::HttpResponse;
use aws_sdk_elasticloadbalancingv2::error::SdkError;
use aws_sdk_elasticloadbalancingv2::operation::RequestId;
use aws_sdk_elasticloadbalancingv2::types as sdk;
use aws_sdk_elasticloadbalancingv2::Client;

use crate::config::ServiceConfig;
use crate::load_balancer::types::{
    classify_status, is_success_status, EndpointId, ServiceError, ServiceResponse, ServiceResult,
    TargetDescription, TargetGroupArn, TargetHealth, TargetHealthDescription, TargetHealthReport,
    DEREGISTER_TARGETS, DESCRIBE_TARGET_HEALTH, REGISTER_TARGETS,
};
use crate::load_balancer::TargetGroupService;

/// What came back from one SDK call.
#[derive(Debug)]
enum Answer<O> {
    /// Decoded output of an accepted call.
    Output(O),
    /// The service answered with a non-success status.
    Status(u16),
    /// The service answered but the body could not be decoded.
    Undecodable(u16),
}

/// Signed target group client.
#[derive(Clone, Debug)]
pub struct AwsElbClient {
    client: Client,
    request_timeout_secs: u64,
}

impl AwsElbClient {
    /// Build a client from the default credential and region chain.
    ///
    /// `service.region` and `service.endpoint` override the chain when set.
    pub async fn from_config(config: &ServiceConfig) -> Self {
        let timeouts = TimeoutConfig::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .operation_timeout(Duration::from_secs(config.request_timeout_secs))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .timeout_config(timeouts)
            .retry_config(RetryConfig::disabled());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::debug!(
            region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("unset"),
            "AWS load balancer client ready"
        );

        Self::from_client(Client::new(&sdk_config), config.request_timeout_secs)
    }

    /// Wrap an already-configured SDK client.
    pub fn from_client(client: Client, request_timeout_secs: u64) -> Self {
        Self {
            client,
            request_timeout_secs,
        }
    }

    /// Sort an SDK result into output, reportable status, or fatal error.
    fn answer<O, E>(
        &self,
        action: &'static str,
        result: Result<O, SdkError<E, HttpResponse>>,
    ) -> ServiceResult<Answer<O>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let error = match result {
            Ok(output) => return Ok(Answer::Output(output)),
            Err(error) => error,
        };

        match &error {
            SdkError::ServiceError(ctx) => {
                let status = classify_status(action, ctx.raw().status().as_u16())?;
                // The SDK reports a success body it cannot parse as an unhandled service error.
                if is_success_status(status) {
                    return Ok(Answer::Undecodable(status));
                }
                return Ok(Answer::Status(status));
            }
            SdkError::ResponseError(ctx) => {
                let status = classify_status(action, ctx.raw().status().as_u16())?;
                return Ok(Answer::Undecodable(status));
            }
            SdkError::TimeoutError(_) => {
                return Err(ServiceError::Timeout {
                    action,
                    secs: self.request_timeout_secs,
                });
            }
            _ => {}
        }

        Err(ServiceError::Transport {
            action,
            source: Box::new(error),
        })
    }

    fn mutation_response<O: RequestId>(answer: Answer<O>) -> ServiceResponse {
        match answer {
            Answer::Output(output) => ServiceResponse {
                status_code: 200,
                request_id: output.request_id().map(str::to_string),
            },
            Answer::Status(status) | Answer::Undecodable(status) => ServiceResponse::new(status),
        }
    }
}

impl TargetGroupService for AwsElbClient {
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<TargetHealthReport> {
        let result = self
            .client
            .describe_target_health()
            .target_group_arn(target_group.as_str())
            .set_targets(Some(sdk_targets(targets)?))
            .send()
            .await;

        let report = match self.answer(DESCRIBE_TARGET_HEALTH, result)? {
            Answer::Output(output) => TargetHealthReport {
                status_code: 200,
                request_id: output.request_id().map(str::to_string),
                descriptions: output
                    .target_health_descriptions()
                    .iter()
                    .filter_map(health_from_sdk)
                    .collect(),
            },
            Answer::Status(status) => empty_report(status),
            Answer::Undecodable(status) => {
                tracing::warn!(
                    action = DESCRIBE_TARGET_HEALTH,
                    status,
                    "Could not decode target health body"
                );
                empty_report(status)
            }
        };

        Ok(report)
    }

    async fn deregister_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<ServiceResponse> {
        let result = self
            .client
            .deregister_targets()
            .target_group_arn(target_group.as_str())
            .set_targets(Some(sdk_targets(targets)?))
            .send()
            .await;

        Ok(Self::mutation_response(self.answer(DEREGISTER_TARGETS, result)?))
    }

    async fn register_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> ServiceResult<ServiceResponse> {
        let result = self
            .client
            .register_targets()
            .target_group_arn(target_group.as_str())
            .set_targets(Some(sdk_targets(targets)?))
            .send()
            .await;

        Ok(Self::mutation_response(self.answer(REGISTER_TARGETS, result)?))
    }
}

fn empty_report(status_code: u16) -> TargetHealthReport {
    TargetHealthReport {
        status_code,
        request_id: None,
        descriptions: Vec::new(),
    }
}

fn sdk_targets(targets: &[TargetDescription]) -> ServiceResult<Vec<sdk::TargetDescription>> {
    targets
        .iter()
        .map(|target| {
            Ok(sdk::TargetDescription::builder()
                .id(target.id.as_str())
                .build())
        })
        .collect()
}

fn health_from_sdk(description: &sdk::TargetHealthDescription) -> Option<TargetHealthDescription> {
    let target = description.target()?;
    let health = description.target_health();

    Some(TargetHealthDescription {
        target: TargetDescription::new(EndpointId::from(target.id()?)),
        health_check_port: description.health_check_port().map(str::to_string),
        target_health: TargetHealth {
            state: health.and_then(|h| h.state()).map(|s| s.as_str().to_string()),
            reason: health.and_then(|h| h.reason()).map(|r| r.as_str().to_string()),
            description: health.and_then(|h| h.description()).map(str::to_string),
        },
    })
}
