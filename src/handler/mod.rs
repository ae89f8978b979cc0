//! Transition handler.
//!
//! # Data Flow
//! ```text
//! raw notification
//!     → event::decode (AlarmTransition or DecodeError)
//!     → decision.rs (Register | Deregister | NoOp)
//!     → TargetGroupService call (at most one mutation)
//!     → outcome.rs (logged line, returned Outcome)
//! ```
//!
//! # Design Decisions
//! - Target group is injected at construction and never changes
//! - No retries and no deduplication: identical events issue identical calls
//! - A non-200 mutation is logged as a failure but the invocation still returns `Ok`
//! - The health check before deregistration is logged, never branched on
//! - Only transport, timeout and credential failures abort an invocation

pub mod decision;
pub mod outcome;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ConfigError, HandlerConfig};
use crate::error::HandlerResult;
use crate::event::{AlarmTransition, Notification};
use crate::load_balancer::{
    is_success_status, EndpointId, TargetDescription, TargetGroupArn, TargetGroupService,
    TargetHealthReport,
};

pub use decision::RegistrationAction;
pub use outcome::Outcome;

/// Reacts to one alarm transition by toggling one endpoint's membership.
#[derive(Debug)]
pub struct TransitionHandler<S> {
    target_group: TargetGroupArn,
    service: S,
}

impl<S: TargetGroupService> TransitionHandler<S> {
    /// Create a handler for the configured target group.
    pub fn new(config: &HandlerConfig, service: S) -> Result<Self, ConfigError> {
        if config.target_group.arn.trim().is_empty() {
            return Err(ConfigError::Missing(crate::config::loader::TARGET_GROUP_ENV));
        }
        Ok(Self {
            target_group: config.target_group_arn(),
            service,
        })
    }

    pub fn target_group(&self) -> &TargetGroupArn {
        &self.target_group
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Handle one raw notification.
    pub async fn handle(&self, raw: &str) -> HandlerResult<Outcome> {
        let span = tracing::info_span!(
            "invocation",
            invocation_id = %Uuid::new_v4(),
            alarm_name = tracing::field::Empty,
        );

        async move {
            tracing::info!("Event: {}", raw);

            let notification = Notification::from_json(raw)?;
            let payload = notification.first_payload()?;
            tracing::info!(
                subject = payload.subject.as_deref().unwrap_or(""),
                message_id = payload.message_id.as_deref().unwrap_or(""),
                "Message: {}",
                payload.message
            );

            let message = notification.alarm_message()?;
            let transition = AlarmTransition::try_from(&message)?;
            tracing::Span::current().record("alarm_name", transition.alarm_name.as_str());
            if let Some(reason) = &message.new_state_reason {
                tracing::debug!(reason = %reason, "Alarm state reason");
            }

            self.handle_transition(&transition).await
        }
        .instrument(span)
        .await
    }

    /// Act on an already-decoded transition.
    pub async fn handle_transition(&self, transition: &AlarmTransition) -> HandlerResult<Outcome> {
        let action = RegistrationAction::from_transition(transition.old_state, transition.new_state);

        tracing::debug!(
            alarm_name = %transition.alarm_name,
            old_state = %transition.old_state,
            new_state = %transition.new_state,
            endpoint = %transition.endpoint,
            action = %action,
            "Transition decided"
        );

        let outcome = match action {
            RegistrationAction::Deregister => self.deregister(&transition.endpoint).await?,
            RegistrationAction::Register => self.register(&transition.endpoint).await?,
            RegistrationAction::NoOp => Outcome::NoAction {
                old_state: transition.old_state,
                new_state: transition.new_state,
            },
        };

        if outcome.is_success() {
            tracing::info!("{}", outcome);
        } else {
            tracing::error!("{}", outcome);
        }

        Ok(outcome)
    }

    async fn deregister(&self, endpoint: &EndpointId) -> HandlerResult<Outcome> {
        let targets = [TargetDescription::new(endpoint.clone())];

        // Health is recorded only; deregistration below is unconditional.
        let report = self
            .service
            .describe_target_health(&self.target_group, &targets)
            .await?;
        log_health(endpoint, &report);

        let response = self
            .service
            .deregister_targets(&self.target_group, &targets)
            .await?;

        tracing::debug!(
            status = response.status_code,
            request_id = response.request_id.as_deref().unwrap_or(""),
            "Deregistration answered"
        );

        Ok(self.applied(RegistrationAction::Deregister, endpoint, response.status_code))
    }

    async fn register(&self, endpoint: &EndpointId) -> HandlerResult<Outcome> {
        let targets = [TargetDescription::new(endpoint.clone())];

        let response = self
            .service
            .register_targets(&self.target_group, &targets)
            .await?;

        tracing::debug!(
            status = response.status_code,
            request_id = response.request_id.as_deref().unwrap_or(""),
            "Registration answered"
        );

        Ok(self.applied(RegistrationAction::Register, endpoint, response.status_code))
    }

    fn applied(&self, action: RegistrationAction, endpoint: &EndpointId, status_code: u16) -> Outcome {
        Outcome::Applied {
            action,
            endpoint: endpoint.clone(),
            target_group: self.target_group.clone(),
            status_code,
        }
    }
}

fn log_health(endpoint: &EndpointId, report: &TargetHealthReport) {
    if !is_success_status(report.status_code) {
        tracing::warn!(
            endpoint = %endpoint,
            status = report.status_code,
            "Target health check failed; deregistering anyway"
        );
        return;
    }

    if report.descriptions.is_empty() {
        tracing::info!(endpoint = %endpoint, "Target not reported by target group");
    }
    for description in &report.descriptions {
        tracing::info!(
            endpoint = %description.target.id,
            state = description.target_health.state.as_deref().unwrap_or("unknown"),
            reason = description.target_health.reason.as_deref().unwrap_or(""),
            "Target health before deregistration"
        );
    }
}
