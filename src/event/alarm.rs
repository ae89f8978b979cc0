//! Alarm state-change message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::DecodeError;
use crate::load_balancer::EndpointId;

/// Alarm health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmState {
    Ok,
    Alarm,
    InsufficientData,
}

impl AlarmState {
    pub const ALL: [AlarmState; 3] = [
        AlarmState::Ok,
        AlarmState::Alarm,
        AlarmState::InsufficientData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmState::Ok => "OK",
            AlarmState::Alarm => "ALARM",
            AlarmState::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dimension {
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trigger {
    #[serde(default)]
    pub metric_name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub dimensions: Vec<Dimension>,
}

/// The alarm message embedded in a notification record.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmMessage {
    pub alarm_name: String,
    pub old_state_value: AlarmState,
    pub new_state_value: AlarmState,
    pub trigger: Trigger,
    #[serde(default)]
    pub new_state_reason: Option<String>,
    #[serde(default)]
    pub state_change_time: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl AlarmMessage {
    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(raw).map_err(DecodeError::Message)
    }

    /// `Trigger.Dimensions[0].value`.
    pub fn endpoint_id(&self) -> Result<EndpointId, DecodeError> {
        let dimension = self
            .trigger
            .dimensions
            .first()
            .ok_or(DecodeError::NoDimensions)?;
        if dimension.value.is_empty() {
            return Err(DecodeError::EmptyEndpoint);
        }
        Ok(EndpointId::from(dimension.value.as_str()))
    }
}

/// Typed decode result: everything the handler needs from one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmTransition {
    pub alarm_name: String,
    pub old_state: AlarmState,
    pub new_state: AlarmState,
    pub endpoint: EndpointId,
}

impl TryFrom<&AlarmMessage> for AlarmTransition {
    type Error = DecodeError;

    fn try_from(message: &AlarmMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            alarm_name: message.alarm_name.clone(),
            old_state: message.old_state_value,
            new_state: message.new_state_value,
            endpoint: message.endpoint_id()?,
        })
    }
}
