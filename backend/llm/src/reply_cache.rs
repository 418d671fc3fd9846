//! Reply generation cache.
//!
//! Maps an exact caller utterance to the reply the language model gave for it.
//! Failed generations are never cached, so the next identical utterance goes
//! back to the provider instead of repeating the apology forever.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::{debug, warn};

use ringforge_core::{LlmProvider, LlmRequest, RingError, FALLBACK_PHRASE};

/// Fixed parameters of every generation request.
#[derive(Debug, Clone)]
pub struct ReplySettings {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl ReplySettings {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            system_prompt: system_prompt.into(),
            max_tokens: 30,
            temperature: 0.9,
            timeout: Duration::from_secs(2),
        }
    }
}

pub struct ReplyCache {
    provider: Arc<dyn LlmProvider>,
    settings: ReplySettings,
    cache: Cache<String, String>,
}

impl ReplyCache {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ReplySettings, capacity: u64) -> Self {
        Self {
            provider,
            settings,
            cache: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    /// Reply for `utterance`, generating it on a miss.
    ///
    /// Concurrent misses for the same utterance share one provider call.
    /// Any failure yields [`FALLBACK_PHRASE`].
    pub async fn get_or_generate(&self, utterance: &str) -> String {
        let result = self
            .cache
            .try_get_with(utterance.to_string(), self.generate(utterance))
            .await;
        // Settle eviction so capacity and LRU order are exact from here on.
        self.cache.run_pending_tasks().await;

        match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    kind = err.kind(),
                    error = %err,
                    "Reply generation failed; using fallback"
                );
                FALLBACK_PHRASE.to_string()
            }
        }
    }

    async fn generate(&self, utterance: &str) -> Result<String, RingError> {
        let request = LlmRequest {
            model: self.settings.model.clone(),
            system_prompt: self.settings.system_prompt.clone(),
            user_prompt: utterance.to_string(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| RingError::timeout(self.provider.name(), self.settings.timeout))??;

        let reply = response.content.trim().to_string();
        if reply.is_empty() {
            return Err(RingError::malformed(self.provider.name(), "empty reply"));
        }

        debug!(
            provider = %response.provider,
            latency_ms = response.latency_ms,
            tokens = response.tokens_used,
            "Reply generated"
        );
        Ok(reply)
    }

    pub fn contains(&self, utterance: &str) -> bool {
        self.cache.contains_key(utterance)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    fn cache_with(provider: Arc<MockProvider>, capacity: u64) -> ReplyCache {
        ReplyCache::new(provider, ReplySettings::new("You are Mirai."), capacity)
    }

    #[tokio::test]
    async fn hit_does_not_call_provider_again() {
        let provider = Arc::new(MockProvider::new("mock").with_response("We build AI products."));
        let cache = cache_with(provider.clone(), 100);

        let first = cache.get_or_generate("What do you do?").await;
        let second = cache.get_or_generate("What do you do?").await;

        assert_eq!(first, "We build AI products.");
        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn keys_are_not_normalized() {
        let provider = Arc::new(MockProvider::new("mock"));
        let cache = cache_with(provider.clone(), 100);

        cache.get_or_generate("Hello").await;
        cache.get_or_generate("hello").await;
        cache.get_or_generate("hello ").await;

        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn request_is_single_turn_with_fixed_parameters() {
        let provider = Arc::new(MockProvider::new("mock"));
        let cache = cache_with(provider.clone(), 100);

        cache.get_or_generate("Tell me about Iffort").await;

        let request = provider.last_request().unwrap();
        assert_eq!(request.system_prompt, "You are Mirai.");
        assert_eq!(request.user_prompt, "Tell me about Iffort");
        assert_eq!(request.max_tokens, 30);
        assert!((request.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(request.model, "gpt-4o-mini");
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_returns_fallback_without_poisoning() {
        let provider = Arc::new(MockProvider::new("slow").with_delay(Duration::from_secs(5)));
        let cache = cache_with(provider.clone(), 100);

        let reply = cache.get_or_generate("Are you there?").await;
        assert_eq!(reply, FALLBACK_PHRASE);
        assert!(!cache.contains("Are you there?"));

        let again = cache.get_or_generate("Are you there?").await;
        assert_eq!(again, FALLBACK_PHRASE);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failure_is_retried_on_next_identical_utterance() {
        let provider = Arc::new(MockProvider::new("flaky").failing_first(1));
        let cache = cache_with(provider.clone(), 100);

        assert_eq!(cache.get_or_generate("hi").await, FALLBACK_PHRASE);
        assert_eq!(cache.get_or_generate("hi").await, "reply to: hi");
        assert_eq!(cache.get_or_generate("hi").await, "reply to: hi");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn blank_reply_is_treated_as_failure() {
        let provider = Arc::new(MockProvider::new("mock").with_response("   "));
        let cache = cache_with(provider.clone(), 100);

        assert_eq!(cache.get_or_generate("hi").await, FALLBACK_PHRASE);
        assert!(!cache.contains("hi"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_call() {
        let provider =
            Arc::new(MockProvider::new("mock").with_delay(Duration::from_millis(500)));
        let cache = Arc::new(cache_with(provider.clone(), 100));

        let (a, b) = tokio::join!(
            cache.get_or_generate("pricing?"),
            cache.get_or_generate("pricing?")
        );

        assert_eq!(a, b);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn overflow_evicts_least_recently_used() {
        let provider = Arc::new(MockProvider::new("mock"));
        let cache = cache_with(provider.clone(), 100);

        for i in 0..100 {
            cache.get_or_generate(&format!("utterance {i}")).await;
        }
        // Touch the oldest entry so utterance 1 becomes least recently used.
        cache.get_or_generate("utterance 0").await;
        cache.get_or_generate("utterance 100").await;

        assert_eq!(provider.calls(), 101);
        assert_eq!(cache.entry_count(), 100);
        assert!(cache.contains("utterance 0"));
        assert!(!cache.contains("utterance 1"));
        assert!(cache.contains("utterance 2"));
        assert!(cache.contains("utterance 100"));
    }
}
