//! Synthesized-audio cache.
//!
//! Maps exact reply text to the audio file rendered for it. A failed render
//! falls back to the fixed apology phrase once; if that fails too the caller
//! gets [`AudioLocator::Silence`]. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use media::AudioStore;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::{debug, warn};

use ringforge_core::{AudioLocator, FALLBACK_PHRASE, RingError};

use crate::engine::{AudioFormat, TtsProvider, TtsRequest};

pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AudioCache {
    provider: Arc<dyn TtsProvider>,
    store: AudioStore,
    format: AudioFormat,
    timeout: Duration,
    cache: Cache<String, String>,
}

impl AudioCache {
    pub fn new(provider: Arc<dyn TtsProvider>, store: AudioStore, capacity: u64) -> Self {
        let format = AudioFormat::default();
        Self {
            provider,
            store: store.with_extension(format.extension()),
            format,
            timeout: DEFAULT_SYNTHESIS_TIMEOUT,
            cache: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Audio for `text`, rendering it on a miss.
    ///
    /// At most two renders per call: the text itself, then the fallback
    /// phrase. A returned file is fully written before this resolves.
    pub async fn get_or_synthesize(&self, text: &str) -> AudioLocator {
        let mut candidates = vec![text];
        if text != FALLBACK_PHRASE {
            candidates.push(FALLBACK_PHRASE);
        }

        for candidate in candidates {
            let result = self
                .cache
                .try_get_with(candidate.to_string(), self.render(candidate))
                .await;
            self.cache.run_pending_tasks().await;

            match result {
                Ok(filename) => return AudioLocator::File(filename),
                Err(err) => warn!(
                    provider = self.provider.name(),
                    kind = err.kind(),
                    error = %err,
                    fallback = candidate != FALLBACK_PHRASE,
                    "Speech synthesis failed"
                ),
            }
        }

        warn!("No audio available; answering without playback");
        AudioLocator::Silence
    }

    async fn render(&self, text: &str) -> Result<String, RingError> {
        let request = TtsRequest {
            text: text.to_string(),
            format: self.format,
            ..TtsRequest::default()
        };

        let work = async {
            let stream = self.provider.synthesize(request).await?;
            self.store.write_stream(stream).await
        };
        let filename = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| RingError::timeout(self.provider.name(), self.timeout))??;

        debug!(provider = self.provider.name(), %filename, "Audio rendered");
        Ok(filename)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.cache.contains_key(text)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn store(&self) -> &AudioStore {
        &self.store
    }
}
