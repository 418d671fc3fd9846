//! Telephony vendor webhooks.
//!
//! Every handler answers 200 with a call-control document. Bad form data is
//! treated as an empty utterance so the caller just hears the retry prompt.

use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    http::header,
    response::{IntoResponse, Response},
};
use ringforge_core::Utterance;
use ringforge_telephony::CallControlDocument;
use serde::Deserialize;
use tracing::warn;

use crate::server::GatewayState;

const UNKNOWN_CALL: &str = "unknown";

/// `text/xml` response body.
pub struct Xml(pub CallControlDocument);

impl IntoResponse for Xml {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/xml")], self.0.render()).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallParams {
    #[serde(rename = "CallUUID", default)]
    pub call_uuid: Option<String>,
}

impl CallParams {
    fn call_id(&self) -> &str {
        self.call_uuid
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(UNKNOWN_CALL)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SpeechForm {
    #[serde(rename = "Speech", default)]
    pub speech: String,
    #[serde(rename = "CallUUID", default)]
    pub call_uuid: String,
}

/// `GET /answer`
pub async fn answer_query(
    State(state): State<GatewayState>,
    params: Option<Query<CallParams>>,
) -> Xml {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    Xml(state.controller.answer(params.call_id()).await)
}

/// `POST /answer`
pub async fn answer_form(
    State(state): State<GatewayState>,
    form: Result<Form<CallParams>, FormRejection>,
) -> Xml {
    let params = form.map(|Form(p)| p).unwrap_or_default();
    Xml(state.controller.answer(params.call_id()).await)
}

/// `POST /process_speech`
pub async fn process_speech(
    State(state): State<GatewayState>,
    form: Result<Form<SpeechForm>, FormRejection>,
) -> Xml {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable speech callback; treating as empty");
            SpeechForm::default()
        }
    };
    let call_id = if form.call_uuid.is_empty() {
        UNKNOWN_CALL.to_string()
    } else {
        form.call_uuid
    };

    let utterance = Utterance::new(call_id, form.speech);
    Xml(state.controller.handle_turn(&utterance).await)
}
