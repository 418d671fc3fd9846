use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ringforge_core::{LlmProvider, LlmRequest, LlmResponse, RingError};

const SERVICE: &str = "openai";

/// OpenAI chat completions provider (works with any compatible endpoint).
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, RingError> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let body = ChatRequest {
            model: &request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %request.model, "Sending request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RingError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RingError::rejected(SERVICE, status.as_u16(), error_body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| RingError::malformed(SERVICE, e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RingError::malformed(SERVICE, "completion has no content"))?;

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(LlmResponse {
            content,
            provider: SERVICE.to_string(),
            model: request.model.clone(),
            tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request(text: &str) -> LlmRequest {
        LlmRequest {
            model: "gpt-4o-mini".into(),
            system_prompt: "You are Mirai.".into(),
            user_prompt: text.into(),
            max_tokens: 30,
            temperature: 0.9,
        }
    }

    #[tokio::test]
    async fn sends_single_turn_and_trims_reply() {
        let app = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                // Echo what the provider sent so the test can inspect it.
                let summary = format!(
                    "  {}|{}|{}|{}  ",
                    body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                    body["messages"][0]["role"].as_str().unwrap_or(""),
                    body["messages"][1]["content"].as_str().unwrap_or(""),
                    body["max_tokens"],
                );
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": summary } }],
                    "usage": { "total_tokens": 42 }
                }))
            }),
        );
        let base = spawn_server(app).await;
        let provider = OpenAiProvider::new("sk-test").with_base_url(base);

        let response = provider.complete(&request("hello")).await.unwrap();
        assert_eq!(response.content, "2|system|hello|30");
        assert_eq!(response.tokens_used, 42);
        assert_eq!(response.provider, "openai");
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_server(app).await;
        let provider = OpenAiProvider::new("sk-test").with_base_url(base);

        let err = provider.complete(&request("hello")).await.unwrap_err();
        match err {
            RingError::Rejected { status, message, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_are_malformed() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = spawn_server(app).await;
        let provider = OpenAiProvider::new("sk-test").with_base_url(base);

        let err = provider.complete(&request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let provider = OpenAiProvider::new("sk-test").with_base_url("http://127.0.0.1:1");
        let err = provider.complete(&request("hello")).await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
