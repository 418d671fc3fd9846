//! Plivo REST client for originating calls.

use async_trait::async_trait;
use reqwest::Client;
use ringforge_core::RingError;
use serde::Deserialize;
use tracing::debug;

use crate::voice_call::{CallProvider, OriginateRequest, OutboundCall};

const SERVICE: &str = "plivo";

pub struct PlivoClient {
    auth_id: String,
    auth_token: String,
    base_url: String,
    client: Client,
}

impl PlivoClient {
    pub fn new(auth_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            auth_token: auth_token.into(),
            base_url: "https://api.plivo.com".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Deserialize)]
struct CallCreated {
    #[serde(default)]
    message: Option<String>,
    request_uuid: RequestUuid,
}

/// Plivo answers with a list when a call fans out to several destinations.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequestUuid {
    One(String),
    Many(Vec<String>),
}

impl RequestUuid {
    fn first(self) -> Option<String> {
        match self {
            Self::One(uuid) => Some(uuid),
            Self::Many(uuids) => uuids.into_iter().next(),
        }
    }
}

#[async_trait]
impl CallProvider for PlivoClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn originate(&self, req: &OriginateRequest) -> Result<OutboundCall, RingError> {
        let url = format!("{}/v1/Account/{}/Call/", self.base_url, self.auth_id);
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.auth_id, Some(&self.auth_token))
            .json(req)
            .send()
            .await
            .map_err(|e| RingError::transport(SERVICE, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RingError::rejected(SERVICE, status.as_u16(), body));
        }

        let created: CallCreated = resp
            .json()
            .await
            .map_err(|e| RingError::malformed(SERVICE, e.to_string()))?;
        let request_uuid = created
            .request_uuid
            .first()
            .ok_or_else(|| RingError::malformed(SERVICE, "empty request_uuid"))?;

        debug!(%request_uuid, "Plivo accepted call");
        Ok(OutboundCall {
            request_uuid,
            to: req.to.clone(),
            message: created.message,
        })
    }
}
