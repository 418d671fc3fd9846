//! Static audio server: exposes the audio directory over HTTP so the
//! telephony provider can fetch the files referenced by `<Play>`.

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::{path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime_detect::{detect_mime_type, is_audio};

/// State shared by audio server routes.
#[derive(Clone)]
pub struct AudioServerState {
    pub audio_dir: Arc<PathBuf>,
}

/// Build the audio server router.
///
/// Mount at `/static/audio`:
///   GET /static/audio/:filename  serve an audio file
pub fn audio_router(audio_dir: PathBuf) -> Router {
    let state = AudioServerState {
        audio_dir: Arc::new(audio_dir),
    };
    Router::new()
        .route("/:filename", get(serve_audio))
        .with_state(state)
}

/// GET /:filename: read an audio file from the store.
async fn serve_audio(
    Path(filename): Path<String>,
    State(state): State<AudioServerState>,
) -> Response {
    // Basic path sanitization: reject traversal and hidden partial files.
    if filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.starts_with('.')
    {
        warn!(filename = %filename, "Rejected suspicious audio path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.audio_dir.join(&filename);
    let mime = detect_mime_type(&path);
    if !is_audio(mime) {
        return (StatusCode::NOT_FOUND, "Audio file not found").into_response();
    }
    debug!(path = %path.display(), "Serving audio file");

    match fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=86400"),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Audio file not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read audio file");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read audio").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_existing_file_as_mpeg() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("greeting.mp3"), b"ID3data").unwrap();

        let resp = get(audio_router(tmp.path().to_path_buf()), "/greeting.mp3").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "audio/mpeg");

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"ID3data");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let resp = get(audio_router(tmp.path().to_path_buf()), "/nope.mp3").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_audio_files_are_not_served() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"private").unwrap();
        let resp = get(audio_router(tmp.path().to_path_buf()), "/notes.txt").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn partial_and_traversal_names_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let app = audio_router(tmp.path().to_path_buf());
        let resp = get(app.clone(), "/.abc.mp3.part").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = get(app, "/..secret").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
