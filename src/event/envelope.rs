//! Notification envelope.

use serde::{Deserialize, Serialize};

use crate::event::alarm::AlarmMessage;
use crate::event::DecodeError;

/// Outer notification: a list of delivery records.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Notification {
    #[serde(rename = "Records")]
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsPayload,
}

/// Topic delivery payload. `Message` holds the alarm message as JSON text.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsPayload {
    pub message: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub topic_arn: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Notification {
    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(raw).map_err(DecodeError::Envelope)
    }

    /// The first record's payload.
    pub fn first_payload(&self) -> Result<&SnsPayload, DecodeError> {
        self.records
            .first()
            .map(|record| &record.sns)
            .ok_or(DecodeError::NoRecords)
    }

    /// Decode the alarm message carried by the first record.
    pub fn alarm_message(&self) -> Result<AlarmMessage, DecodeError> {
        let payload = self.first_payload()?;
        AlarmMessage::from_json(&payload.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_decode() {
        let raw = r#"{"Records":[{"EventSource":"aws:sns","Sns":{"Message":"{}","Subject":"ALARM: cpu","TopicArn":"arn:topic"}}]}"#;
        let notification = Notification::from_json(raw).unwrap();
        let payload = notification.first_payload().unwrap();
        assert_eq!(payload.message, "{}");
        assert_eq!(payload.subject.as_deref(), Some("ALARM: cpu"));
        assert_eq!(payload.topic_arn.as_deref(), Some("arn:topic"));
        assert_eq!(payload.message_id, None);
    }

    #[test]
    fn test_empty_records() {
        let notification = Notification::from_json(r#"{"Records":[]}"#).unwrap();
        assert!(matches!(
            notification.first_payload(),
            Err(DecodeError::NoRecords)
        ));
    }

    #[test]
    fn test_missing_message() {
        let err = Notification::from_json(r#"{"Records":[{"Sns":{}}]}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Envelope(_)));
    }

    #[test]
    fn test_not_json() {
        let err = Notification::from_json("Records").unwrap_err();
        assert!(err.to_string().starts_with("Malformed notification envelope"));
    }
}
