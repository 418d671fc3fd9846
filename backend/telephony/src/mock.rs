//! Recording call provider for tests and dry runs.

use std::sync::Mutex;

use async_trait::async_trait;
use ringforge_core::RingError;

use crate::voice_call::{CallProvider, OriginateRequest, OutboundCall};

#[derive(Default)]
pub struct MockCallProvider {
    requests: Mutex<Vec<OriginateRequest>>,
    failing: bool,
}

impl MockCallProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<OriginateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CallProvider for MockCallProvider {
    fn name(&self) -> &str {
        "mock-telephony"
    }

    async fn originate(&self, req: &OriginateRequest) -> Result<OutboundCall, RingError> {
        let count = match self.requests.lock() {
            Ok(mut requests) => {
                requests.push(req.clone());
                requests.len()
            }
            Err(_) => 0,
        };
        if self.failing {
            return Err(RingError::rejected("mock-telephony", 400, "invalid destination"));
        }
        Ok(OutboundCall {
            request_uuid: format!("mock-call-{count}"),
            to: req.to.clone(),
            message: Some("call fired".to_string()),
        })
    }
}
