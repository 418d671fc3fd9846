//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use ringforge_agent::TurnController;
use ringforge_telephony::CallInitiator;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use crate::{control_ui, health_api, webhooks};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub controller: Arc<TurnController>,
    pub initiator: Arc<CallInitiator>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(controller: Arc<TurnController>, initiator: Arc<CallInitiator>) -> Self {
        Self {
            controller,
            initiator,
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: GatewayState, audio_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(control_ui::call_form).post(control_ui::place_call))
        .route(
            "/answer",
            get(webhooks::answer_query).post(webhooks::answer_form),
        )
        .route("/process_speech", post(webhooks::process_speech))
        .route("/api/health", get(health_api::get_health))
        .with_state(state)
        .nest("/static/audio", media::audio_router(audio_dir))
        .layer(TraceLayer::new_for_http())
}

/// Serve until ctrl-c.
#[instrument(skip(app))]
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("gateway server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use media::AudioStore;
    use ringforge_agent::{CallbackLinks, GREETING, RETRY_PROMPT};
    use ringforge_llm::{MockProvider, ReplyCache, ReplySettings};
    use ringforge_telephony::MockCallProvider;
    use ringforge_tts::{AudioCache, MockTts};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Fixture {
        dir: tempfile::TempDir,
        llm: Arc<MockProvider>,
        tts: Arc<MockTts>,
        calls: Arc<MockCallProvider>,
        state: GatewayState,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let llm = Arc::new(MockProvider::new("llm"));
            let tts = Arc::new(MockTts::new());
            let calls = Arc::new(MockCallProvider::new());
            let links = CallbackLinks::new("https://bot.example");

            let replies = Arc::new(ReplyCache::new(
                llm.clone(),
                ReplySettings::new("You are a test."),
                100,
            ));
            let voices = Arc::new(AudioCache::new(
                tts.clone(),
                AudioStore::new(dir.path()),
                100,
            ));
            let controller = Arc::new(TurnController::new(replies, voices, links.clone()));
            let initiator = Arc::new(CallInitiator::new(
                calls.clone(),
                "+15550001111",
                links.answer_url(),
            ));

            Self {
                dir,
                llm,
                tts,
                calls,
                state: GatewayState::new(controller, initiator),
            }
        }

        fn router(&self) -> Router {
            build_router(self.state.clone(), self.dir.path().to_path_buf())
        }
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn content_type(resp: &axum::response::Response) -> &str {
        resp.headers()[header::CONTENT_TYPE].to_str().unwrap()
    }

    #[tokio::test]
    async fn call_form_has_phone_number_field() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains(r#"name="phone_number""#));
    }

    #[tokio::test]
    async fn posting_number_starts_call_in_background() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(form_post("/", "phone_number=%2B15552223333"))
            .await
            .unwrap();

        assert_eq!(body_text(resp).await, "Calling +15552223333...");
        for _ in 0..50 {
            if !f.calls.requests().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let requests = f.calls.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].to, "+15552223333");
        assert_eq!(requests[0].answer_url, "https://bot.example/answer");
    }

    #[tokio::test]
    async fn blank_number_places_no_call() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(form_post("/", "phone_number=+++"))
            .await
            .unwrap();

        assert_eq!(body_text(resp).await, "Please provide a phone number.");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(f.calls.requests().is_empty());
    }

    #[tokio::test]
    async fn answer_returns_greeting_document() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(
                Request::get("/answer?CallUUID=call-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/xml");
        let xml = body_text(resp).await;
        assert!(xml.starts_with("<Response><Play>https://bot.example/static/audio/"));
        assert!(xml.contains(r#"<GetInput action="https://bot.example/process_speech""#));
        assert_eq!(f.tts.texts(), vec![GREETING]);
    }

    #[tokio::test]
    async fn answer_accepts_vendor_post() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(form_post("/answer", "CallUUID=call-1&From=%2B15550001111"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("<GetInput"));
    }

    #[tokio::test]
    async fn speech_is_answered_with_reply_audio() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(form_post(
                "/process_speech",
                "Speech=What+do+you+do%3F&CallUUID=call-1",
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "text/xml");
        assert!(body_text(resp).await.contains("<Play>"));
        assert_eq!(f.llm.calls(), 1);
        assert_eq!(f.tts.texts(), vec!["reply to: What do you do?"]);
    }

    #[tokio::test]
    async fn malformed_speech_callback_is_empty_input() {
        let f = Fixture::new();
        let resp = f
            .router()
            .oneshot(
                Request::post("/process_speech")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("<GetInput"));
        assert_eq!(f.llm.calls(), 0);
        assert_eq!(f.tts.texts(), vec![RETRY_PROMPT]);
    }

    #[tokio::test]
    async fn synthesized_audio_is_served() {
        let f = Fixture::new();
        let router = f.router();
        let xml = body_text(
            router
                .clone()
                .oneshot(Request::get("/answer").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        let start = xml.find("/static/audio/").unwrap();
        let end = xml.find("</Play>").unwrap();
        let path = &xml[start..end];

        let resp = router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(content_type(&resp), "audio/mpeg");
        assert_eq!(body_text(resp).await, format!("audio:{GREETING}"));
    }

    #[tokio::test]
    async fn health_reports_cache_sizes() {
        let f = Fixture::new();
        let router = f.router();
        router
            .clone()
            .oneshot(form_post("/process_speech", "Speech=Hi&CallUUID=c"))
            .await
            .unwrap();

        let resp = router
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["cache_entries"]["replies"], 1);
        assert_eq!(json["cache_entries"]["audio"], 1);
    }
}
