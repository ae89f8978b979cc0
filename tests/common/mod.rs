//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alarm_target_handler::load_balancer::{
    ServiceError, ServiceResponse, TargetDescription, TargetGroupArn, TargetGroupService,
    TargetHealthReport,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Router};
use tokio::net::TcpListener;

/// One call observed by [`RecordingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Describe { target_group: String, targets: Vec<String> },
    Deregister { target_group: String, targets: Vec<String> },
    Register { target_group: String, targets: Vec<String> },
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Call::Describe { .. })
    }
}

/// In-process target group service that records every call.
#[derive(Debug)]
pub struct RecordingService {
    status: u16,
    unavailable: bool,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl RecordingService {
    /// Answer every call with `status`.
    pub fn responding(status: u16) -> Self {
        Self {
            status,
            unavailable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call as if the service were unreachable.
    pub fn unreachable() -> Self {
        Self {
            status: 0,
            unavailable: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    fn record(&self, call: Call) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable {
            return Err(ServiceError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

fn ids(targets: &[TargetDescription]) -> Vec<String> {
    targets.iter().map(|t| t.id.to_string()).collect()
}

impl TargetGroupService for RecordingService {
    async fn describe_target_health(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> Result<TargetHealthReport, ServiceError> {
        self.record(Call::Describe {
            target_group: target_group.to_string(),
            targets: ids(targets),
        })?;
        Ok(TargetHealthReport {
            status_code: self.status,
            request_id: None,
            descriptions: Vec::new(),
        })
    }

    async fn deregister_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> Result<ServiceResponse, ServiceError> {
        self.record(Call::Deregister {
            target_group: target_group.to_string(),
            targets: ids(targets),
        })?;
        Ok(ServiceResponse::new(self.status))
    }

    async fn register_targets(
        &self,
        target_group: &TargetGroupArn,
        targets: &[TargetDescription],
    ) -> Result<ServiceResponse, ServiceError> {
        self.record(Call::Register {
            target_group: target_group.to_string(),
            targets: ids(targets),
        })?;
        Ok(ServiceResponse::new(self.status))
    }
}

/// Build an SNS-style notification around an alarm message.
#[allow(dead_code)]
pub fn notification(old_state: &str, new_state: &str, endpoint: &str) -> String {
    let message = serde_json::json!({
        "AlarmName": "web-unhealthy",
        "NewStateValue": new_state,
        "NewStateReason": "Threshold Crossed: 1 datapoint was greater than the threshold",
        "OldStateValue": old_state,
        "Trigger": {
            "MetricName": "StatusCheckFailed",
            "Namespace": "AWS/EC2",
            "Dimensions": [{ "name": "InstanceId", "value": endpoint }]
        }
    });
    wrap_message(&message.to_string())
}

/// Wrap a raw message string in a single-record envelope.
#[allow(dead_code)]
pub fn wrap_message(message: &str) -> String {
    serde_json::json!({
        "Records": [{
            "EventSource": "aws:sns",
            "Sns": {
                "Subject": "ALARM: \"web-unhealthy\"",
                "TopicArn": "arn:aws:sns:us-east-1:123456789012:alarms",
                "MessageId": "0d3f7a1c",
                "Message": message
            }
        }]
    })
    .to_string()
}

/// A running mock of the load balancer Query API.
#[allow(dead_code)]
pub struct MockElb {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

#[allow(dead_code)]
impl MockElb {
    pub fn endpoint(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Form parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|mut params| params.remove("Action"))
            .collect()
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    delay: Duration,
    body: Option<&'static str>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Start a mock Query API answering every action with `status`.
#[allow(dead_code)]
pub async fn start_mock_elb(status: u16) -> MockElb {
    start_mock_elb_with_delay(status, Duration::ZERO).await
}

/// Start a mock Query API that waits `delay` before answering.
#[allow(dead_code)]
pub async fn start_mock_elb_with_delay(status: u16, delay: Duration) -> MockElb {
    start(status, delay, None).await
}

/// Start a mock that answers every action with `status` and the same raw `body`.
#[allow(dead_code)]
pub async fn start_mock_elb_with_body(status: u16, body: &'static str) -> MockElb {
    start(status, Duration::ZERO, Some(body)).await
}

async fn start(status: u16, delay: Duration, body: Option<&'static str>) -> MockElb {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        delay,
        body,
        requests: requests.clone(),
    };

    let app = Router::new().route("/", post(query_api)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockElb { addr, requests }
}

async fn query_api(
    State(state): State<MockState>,
    Form(params): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let action = params.get("Action").cloned().unwrap_or_default();
    let target = params
        .get("Targets.member.1.Id")
        .cloned()
        .unwrap_or_default();
    state.requests.lock().unwrap().push(params);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    if let Some(body) = state.body {
        return (state.status, body.to_string());
    }

    let body = match action.as_str() {
        "DescribeTargetHealth" => serde_json::json!({
            "DescribeTargetHealthResponse": {
                "DescribeTargetHealthResult": {
                    "TargetHealthDescriptions": [{
                        "Target": { "Id": target },
                        "HealthCheckPort": "80",
                        "TargetHealth": {
                            "State": "unhealthy",
                            "Reason": "Target.FailedHealthChecks"
                        }
                    }]
                },
                "ResponseMetadata": { "RequestId": "describe-1" }
            }
        }),
        other => {
            let mut body = serde_json::Map::new();
            body.insert(
                format!("{}Response", other),
                serde_json::json!({
                    "ResponseMetadata": { "RequestId": format!("{}-1", other) }
                }),
            );
            serde_json::Value::Object(body)
        }
    };

    (state.status, body.to_string())
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
