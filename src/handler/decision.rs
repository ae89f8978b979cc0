//! Transition decision table.
//!
//! ```text
//! OK    → ALARM : Deregister
//! ALARM → OK    : Register
//! anything else : NoOp
//! ```

use std::fmt;

use crate::event::AlarmState;

/// Membership change derived from one alarm transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    Register,
    Deregister,
    NoOp,
}

impl RegistrationAction {
    pub fn from_transition(old_state: AlarmState, new_state: AlarmState) -> Self {
        match (old_state, new_state) {
            (AlarmState::Ok, AlarmState::Alarm) => RegistrationAction::Deregister,
            (AlarmState::Alarm, AlarmState::Ok) => RegistrationAction::Register,
            _ => RegistrationAction::NoOp,
        }
    }

    /// Whether this action issues a mutating call.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, RegistrationAction::NoOp)
    }

    /// Past-tense verb used in outcome lines.
    pub fn past_tense(&self) -> &'static str {
        match self {
            RegistrationAction::Register => "registered",
            RegistrationAction::Deregister => "deregistered",
            RegistrationAction::NoOp => "left unchanged",
        }
    }
}

impl fmt::Display for RegistrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistrationAction::Register => "register",
            RegistrationAction::Deregister => "deregister",
            RegistrationAction::NoOp => "no-op",
        })
    }
}
