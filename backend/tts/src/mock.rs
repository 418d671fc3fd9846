//! Scripted TTS provider for tests and offline runs.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ringforge_core::{AudioStream, RingError};

use crate::engine::{TtsProvider, TtsRequest};

/// Produces `audio:{text}` as a two-chunk stream.
#[derive(Default)]
pub struct MockTts {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    fail_texts: HashSet<String>,
    fail_all: bool,
    delay: Option<Duration>,
}

impl MockTts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always_failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_for(mut self, text: impl Into<String>) -> Self {
        self.fail_texts.insert(text.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts requested so far, in call order.
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TtsProvider for MockTts {
    fn name(&self) -> &str {
        "mock-tts"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<AudioStream, RingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut texts) = self.texts.lock() {
            texts.push(req.text.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all || self.fail_texts.contains(&req.text) {
            return Err(RingError::rejected("mock-tts", 503, "voice unavailable"));
        }

        let chunks = vec![
            Ok(Bytes::from_static(b"audio:")),
            Ok(Bytes::from(req.text.into_bytes())),
        ];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
