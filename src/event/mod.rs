//! Inbound notification decoding.
//!
//! # Data Flow
//! ```text
//! raw notification JSON
//!     → envelope.rs (Records[0].Sns.Message)
//!     → alarm.rs (AlarmMessage: names, states, trigger dimensions)
//!     → AlarmTransition (typed result the handler acts on)
//! ```
//!
//! # Design Decisions
//! - Decoding is a single typed step: success or `DecodeError`, never a partial result
//! - Only the first record and the first trigger dimension are consulted
//! - Unknown state values are rejected rather than mapped to a default

pub mod alarm;
pub mod envelope;

use thiserror::Error;

pub use alarm::{AlarmMessage, AlarmState, AlarmTransition, Dimension, Trigger};
pub use envelope::{Notification, NotificationRecord, SnsPayload};

/// Errors produced while decoding a notification.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The envelope itself is not valid JSON or lacks required fields.
    #[error("Malformed notification envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope carried no records.
    #[error("Notification contains no records")]
    NoRecords,

    /// The embedded alarm message is not valid JSON or lacks required fields.
    #[error("Malformed alarm message: {0}")]
    Message(#[source] serde_json::Error),

    /// `Trigger.Dimensions` was present but empty.
    #[error("Alarm trigger has no dimensions")]
    NoDimensions,

    /// The first dimension's value is empty.
    #[error("Alarm trigger dimension has an empty value")]
    EmptyEndpoint,
}

/// Decode a raw notification into the transition it reports.
pub fn decode_transition(raw: &str) -> Result<AlarmTransition, DecodeError> {
    let notification = Notification::from_json(raw)?;
    let message = notification.alarm_message()?;
    AlarmTransition::try_from(&message)
}
