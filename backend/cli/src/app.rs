//! Builds the running services from the effective config.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use media::AudioStore;
use ringforge_agent::{AssistantIdentity, CallbackLinks, TurnController};
use ringforge_config::{defaults::DEFAULT_VOICE_ID, RingConfig};
use ringforge_core::LlmProvider;
use ringforge_gateway::GatewayState;
use ringforge_llm::{OpenAiProvider, ReplyCache, ReplySettings};
use ringforge_telephony::{CallInitiator, PlivoClient};
use ringforge_tts::{create_tts, AudioCache, TtsProviderKind};
use tracing::info;

pub struct Services {
    pub controller: Arc<TurnController>,
    pub initiator: Arc<CallInitiator>,
    pub audio_dir: PathBuf,
}

impl Services {
    /// Wire providers, caches and the turn controller. Creates the audio dir.
    pub async fn build(config: &RingConfig) -> Result<Self> {
        let store = AudioStore::new(&config.storage.audio_dir);
        store
            .ensure_dir()
            .await
            .with_context(|| format!("Failed to create audio dir {}", config.storage.audio_dir))?;
        let audio_dir = store.dir().to_path_buf();

        let llm: Arc<dyn LlmProvider> = Arc::new(
            OpenAiProvider::new(config.llm.api_key.clone()).with_base_url(&config.llm.base_url),
        );
        let replies = Arc::new(ReplyCache::new(
            llm,
            reply_settings(config),
            config.cache.reply_capacity,
        ));

        let tts = create_tts(tts_kind(config)?);
        info!(provider = tts.name(), "Speech synthesis provider ready");
        let voices = Arc::new(
            AudioCache::new(tts, store, config.cache.audio_capacity)
                .with_timeout(Duration::from_millis(config.tts.timeout_ms)),
        );

        let links = CallbackLinks::new(&config.server.public_base_url);
        let initiator = Arc::new(call_initiator(config, &links));
        let controller = Arc::new(
            TurnController::new(replies, voices, links)
                .with_max_reply_chars(config.conversation.max_reply_chars),
        );

        Ok(Self {
            controller,
            initiator,
            audio_dir,
        })
    }

    pub fn gateway_state(&self) -> GatewayState {
        GatewayState::new(self.controller.clone(), self.initiator.clone())
    }
}

pub fn reply_settings(config: &RingConfig) -> ReplySettings {
    let system_prompt = config
        .llm
        .system_prompt
        .clone()
        .unwrap_or_else(|| AssistantIdentity::default().compile());
    ReplySettings {
        model: config.llm.model.clone(),
        system_prompt,
        max_tokens: config.llm.max_tokens,
        temperature: config.llm.temperature,
        timeout: Duration::from_millis(config.llm.timeout_ms),
    }
}

pub fn tts_kind(config: &RingConfig) -> Result<TtsProviderKind> {
    let tts = &config.tts;
    match tts.provider.as_str() {
        "elevenlabs" => Ok(TtsProviderKind::ElevenLabs {
            api_key: tts.api_key.clone(),
            voice_id: Some(tts.voice_id.clone()),
            model_id: tts.model_id.clone(),
            output_format: tts.output_format.clone(),
            base_url: tts.base_url.clone(),
        }),
        // OpenAI speech shares the chat credentials; the ElevenLabs default voice means nothing there.
        "openai" => Ok(TtsProviderKind::OpenAi {
            api_key: config.llm.api_key.clone(),
            voice: Some(tts.voice_id.clone()).filter(|v| v != DEFAULT_VOICE_ID),
            base_url: config.llm.base_url.clone(),
        }),
        other => bail!("Unknown TTS provider '{other}'"),
    }
}

pub fn call_initiator(config: &RingConfig, links: &CallbackLinks) -> CallInitiator {
    let telephony = &config.telephony;
    let client = PlivoClient::new(&telephony.auth_id, &telephony.auth_token)
        .with_base_url(&telephony.api_base_url);
    CallInitiator::new(
        Arc::new(client),
        &telephony.origin_number,
        links.answer_url(),
    )
}
