//! Call Event Logger
//!
//! Typed per-call events (call requested, answered, utterance, reply, error)
//! written through `tracing` under the `call_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CallEvent {
    CallRequested { to: String },
    Answered,
    UtteranceReceived { text: String },
    EmptyUtterance,
    ReplyReady { reply: String, audio: Option<String> },
    Error { stage: String, error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub call_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: CallEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts the event's free text and emits it as a structured trace record.
    pub fn log_event(call_id: &str, event: CallEvent) {
        let entry = Self::entry(call_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "call_events", call_id = %entry.call_id, event = %json, "Call event");
    }

    fn entry(call_id: &str, mut event: CallEvent) -> EventLogEntry {
        match &mut event {
            CallEvent::CallRequested { to } => {
                *to = redact_sensitive_data(to);
            }
            CallEvent::UtteranceReceived { text } => {
                *text = redact_sensitive_data(text);
            }
            CallEvent::ReplyReady { reply, .. } => {
                *reply = redact_sensitive_data(reply);
            }
            CallEvent::Error { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            CallEvent::Answered | CallEvent::EmptyUtterance => {}
        }

        EventLogEntry {
            call_id: call_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_destination_number() {
        let entry = EventLogger::entry(
            "call-1",
            CallEvent::CallRequested {
                to: "+1-555-123-4567".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["call_id"], "call-1");
        assert_eq!(json["event"]["type"], "CallRequested");
        assert_eq!(json["event"]["to"], "[REDACTED_PHONE]");
    }

    #[test]
    fn utterance_without_secrets_is_untouched() {
        let entry = EventLogger::entry(
            "call-2",
            CallEvent::UtteranceReceived {
                text: "what do you do".into(),
            },
        );
        match entry.event {
            CallEvent::UtteranceReceived { text } => assert_eq!(text, "what do you do"),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
