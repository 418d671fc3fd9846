/// Outbound call origination: the provider seam and its request/response types.
use async_trait::async_trait;
use ringforge_core::RingError;
use serde::{Deserialize, Serialize};

/// Parameters of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginateRequest {
    pub from: String,
    pub to: String,
    /// The vendor fetches the first call-control document from here.
    pub answer_url: String,
    pub answer_method: String,
}

impl OriginateRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        answer_url: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            answer_url: answer_url.into(),
            answer_method: "GET".to_string(),
        }
    }
}

/// An accepted outbound call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundCall {
    pub request_uuid: String,
    pub to: String,
    pub message: Option<String>,
}

#[async_trait]
pub trait CallProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn originate(&self, req: &OriginateRequest) -> Result<OutboundCall, RingError>;
}
