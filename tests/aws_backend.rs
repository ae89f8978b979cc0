//! AWS SDK backend tests against the in-process mock service.

use std::time::Duration;

use alarm_target_handler::load_balancer::{
    AwsElbClient, EndpointId, ServiceError, TargetDescription, TargetGroupArn, TargetGroupService,
};
use alarm_target_handler::{HandlerConfig, HandlerError, TransitionHandler};
use aws_sdk_elasticloadbalancingv2::config::retry::RetryConfig;
use aws_sdk_elasticloadbalancingv2::config::timeout::TimeoutConfig;
use aws_sdk_elasticloadbalancingv2::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_elasticloadbalancingv2::{Client, Config};

mod common;

const DEREGISTER_BODY: &str = r#"<DeregisterTargetsResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
  <DeregisterTargetsResult/>
  <ResponseMetadata><RequestId>deregister-1</RequestId></ResponseMetadata>
</DeregisterTargetsResponse>"#;

const ACCESS_DENIED_BODY: &str = r#"<ErrorResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
  <Error><Type>Sender</Type><Code>AccessDenied</Code><Message>not authorized</Message></Error>
  <RequestId>denied-1</RequestId>
</ErrorResponse>"#;

const VALIDATION_BODY: &str = r#"<ErrorResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2015-12-01/">
  <Error><Type>Sender</Type><Code>ValidationError</Code><Message>bad target</Message></Error>
  <RequestId>invalid-1</RequestId>
</ErrorResponse>"#;

fn client(endpoint: String) -> AwsElbClient {
    let config = Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(endpoint)
        .retry_config(RetryConfig::disabled())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(2))
                .build(),
        )
        .build();
    AwsElbClient::from_client(Client::from_conf(config), 2)
}

fn handler(endpoint: String) -> TransitionHandler<AwsElbClient> {
    TransitionHandler::new(&HandlerConfig::for_target_group("arn:tg-A"), client(endpoint)).unwrap()
}

#[tokio::test]
async fn test_deregister_through_sdk() {
    let mock = common::start_mock_elb_with_body(200, DEREGISTER_BODY).await;

    let outcome = handler(mock.endpoint())
        .handle(&common::notification("OK", "ALARM", "i-0123"))
        .await
        .unwrap();

    // The health body is a deregistration answer; it is logged and ignored.
    assert!(outcome.is_success());
    assert_eq!(mock.actions(), vec!["DescribeTargetHealth", "DeregisterTargets"]);

    let requests = mock.requests();
    assert_eq!(requests[1]["TargetGroupArn"], "arn:tg-A");
    assert_eq!(requests[1]["Targets.member.1.Id"], "i-0123");
    assert!(!requests[1].contains_key("Targets.member.1.Port"));
}

#[tokio::test]
async fn test_service_rejection_is_failure_outcome() {
    let mock = common::start_mock_elb_with_body(400, VALIDATION_BODY).await;

    let outcome = handler(mock.endpoint())
        .handle(&common::notification("ALARM", "OK", "i-0123"))
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(
        outcome.to_string(),
        "Error: Target i-0123 could not be registered from target group arn:tg-A."
    );
    assert_eq!(mock.actions(), vec!["RegisterTargets"]);
}

#[tokio::test]
async fn test_access_denied_is_fatal() {
    let mock = common::start_mock_elb_with_body(403, ACCESS_DENIED_BODY).await;

    let err = handler(mock.endpoint())
        .handle(&common::notification("OK", "ALARM", "i-0123"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HandlerError::Unavailable(ServiceError::Unauthorized {
            action: "DescribeTargetHealth",
            status: 403
        })
    ));
    assert_eq!(mock.actions(), vec!["DescribeTargetHealth"]);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let addr = common::closed_addr().await;

    let err = client(format!("http://{}/", addr))
        .register_targets(
            &TargetGroupArn::from("arn:tg-A"),
            &[TargetDescription::new(EndpointId::from("i-0123"))],
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Transport { action: "RegisterTargets", .. }
    ));
}
