//! Outbound Call Initiator.
//!
//! Fire-and-forget: failures are logged and swallowed, never retried.

use std::sync::Arc;

use logging::{CallEvent, EventLogger};
use tracing::{info, warn};

use crate::voice_call::{CallProvider, OriginateRequest, OutboundCall};

/// Call id used for events logged before the vendor assigns one.
const PENDING_CALL_ID: &str = "outbound";

pub struct CallInitiator {
    provider: Arc<dyn CallProvider>,
    from_number: String,
    answer_url: String,
}

impl CallInitiator {
    pub fn new(
        provider: Arc<dyn CallProvider>,
        from_number: impl Into<String>,
        answer_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            from_number: from_number.into(),
            answer_url: answer_url.into(),
        }
    }

    /// Ask the vendor to dial `destination`. Returns the accepted call, or
    /// `None` after logging the failure.
    pub async fn initiate(&self, destination: &str) -> Option<OutboundCall> {
        EventLogger::log_event(
            PENDING_CALL_ID,
            CallEvent::CallRequested {
                to: destination.to_string(),
            },
        );

        let request = OriginateRequest::new(&self.from_number, destination, &self.answer_url);
        match self.provider.originate(&request).await {
            Ok(call) => {
                info!(
                    provider = self.provider.name(),
                    request_uuid = %call.request_uuid,
                    "Outbound call requested"
                );
                Some(call)
            }
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    kind = err.kind(),
                    error = %err,
                    "Outbound call failed"
                );
                EventLogger::log_event(
                    PENDING_CALL_ID,
                    CallEvent::Error {
                        stage: "initiate".to_string(),
                        error_msg: err.to_string(),
                    },
                );
                None
            }
        }
    }
}
