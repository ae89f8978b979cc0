//! Invocation outcome and its human-readable line.

use std::fmt;

use crate::event::AlarmState;
use crate::handler::decision::RegistrationAction;
use crate::load_balancer::{is_success_status, EndpointId, TargetGroupArn};

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mutating call was issued and answered.
    Applied {
        action: RegistrationAction,
        endpoint: EndpointId,
        target_group: TargetGroupArn,
        status_code: u16,
    },
    /// The transition was not a clean health flip.
    NoAction {
        old_state: AlarmState,
        new_state: AlarmState,
    },
}

impl Outcome {
    pub fn action(&self) -> RegistrationAction {
        match self {
            Outcome::Applied { action, .. } => *action,
            Outcome::NoAction { .. } => RegistrationAction::NoOp,
        }
    }

    /// False only for a mutating call the service did not accept.
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Applied { status_code, .. } => is_success_status(*status_code),
            Outcome::NoAction { .. } => true,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied {
                action,
                endpoint,
                target_group,
                ..
            } => {
                if self.is_success() {
                    write!(
                        f,
                        "Target {} successfully {} from target group {}.",
                        endpoint,
                        action.past_tense(),
                        target_group
                    )
                } else {
                    write!(
                        f,
                        "Error: Target {} could not be {} from target group {}.",
                        endpoint,
                        action.past_tense(),
                        target_group
                    )
                }
            }
            Outcome::NoAction {
                old_state,
                new_state,
            } => write!(
                f,
                "New Alarm State is {}, Old Alarm State is {}. No Action Needed",
                new_state, old_state
            ),
        }
    }
}
