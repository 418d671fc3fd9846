//! Operator page: a one-field form that places an outbound call.

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Html,
};
use serde::Deserialize;
use tracing::warn;

use crate::server::GatewayState;

const CALL_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>ringforge</title></head>
<body>
  <h1>Call with the AI assistant</h1>
  <form method="post" action="/">
    <label for="phone_number">Phone number</label>
    <input type="tel" id="phone_number" name="phone_number" placeholder="+15551234567" required>
    <button type="submit">Call</button>
  </form>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct PlaceCall {
    #[serde(default)]
    pub phone_number: String,
}

/// `GET /`
pub async fn call_form() -> Html<&'static str> {
    Html(CALL_FORM)
}

/// `POST /`: starts the call in the background and answers immediately.
pub async fn place_call(
    State(state): State<GatewayState>,
    form: Result<Form<PlaceCall>, FormRejection>,
) -> String {
    let number = match form {
        Ok(Form(form)) => form.phone_number.trim().to_string(),
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable call form");
            String::new()
        }
    };
    if number.is_empty() {
        return "Please provide a phone number.".to_string();
    }

    let initiator = state.initiator.clone();
    let destination = number.clone();
    tokio::spawn(async move {
        initiator.initiate(&destination).await;
    });

    format!("Calling {number}...")
}
