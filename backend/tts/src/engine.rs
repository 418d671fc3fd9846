/// TTS provider trait and implementations (ElevenLabs + OpenAI TTS).
use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, Response};
use ringforge_core::{AudioStream, RingError};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Audio format for TTS output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
        }
    }

    /// File extension and OpenAI `response_format` value.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
        }
    }
}

/// A TTS request.
#[derive(Debug, Clone)]
pub struct TtsRequest {
    pub text: String,
    /// Provider default when `None`.
    pub voice: Option<String>,
    pub format: AudioFormat,
    pub speed: f32,
}

impl TtsRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

impl Default for TtsRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            voice: None,
            format: AudioFormat::Mp3,
            speed: 1.0,
        }
    }
}

/// Returns the audio body as a chunk stream.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn synthesize(&self, req: TtsRequest) -> Result<AudioStream, RingError>;
}

async fn into_audio_stream(
    service: &'static str,
    resp: Result<Response, reqwest::Error>,
) -> Result<AudioStream, RingError> {
    let resp = resp.map_err(|e| RingError::transport(service, e))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RingError::rejected(service, status.as_u16(), body));
    }
    Ok(Box::pin(
        resp.bytes_stream()
            .map_err(move |e| RingError::transport(service, e)),
    ))
}

// ---------------------------------------------------------------------------
// OpenAI TTS
// ---------------------------------------------------------------------------

pub struct OpenAiTts {
    api_key: String,
    model: String,
    default_voice: String,
    base_url: String,
    client: Client,
}

impl OpenAiTts {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "tts-1".to_string(),
            default_voice: "nova".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct OpenAiTtsBody {
    model: String,
    input: String,
    voice: String,
    response_format: &'static str,
    speed: f32,
}

#[async_trait]
impl TtsProvider for OpenAiTts {
    fn name(&self) -> &str {
        "openai-tts"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<AudioStream, RingError> {
        let body = OpenAiTtsBody {
            model: self.model.clone(),
            input: req.text,
            voice: req.voice.unwrap_or_else(|| self.default_voice.clone()),
            response_format: req.format.extension(),
            speed: req.speed,
        };
        info!("[TTS/OpenAI] Synthesizing with model={}", body.model);
        let resp = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;
        into_audio_stream("openai-tts", resp).await
    }
}

// ---------------------------------------------------------------------------
// ElevenLabs TTS
// ---------------------------------------------------------------------------

pub struct ElevenLabsTts {
    api_key: String,
    default_voice_id: String,
    model_id: String,
    output_format: String,
    base_url: String,
    client: Client,
}

impl ElevenLabsTts {
    pub fn new(api_key: String, voice_id: Option<String>) -> Self {
        Self {
            api_key,
            default_voice_id: voice_id.unwrap_or_else(|| "21m00Tcm4TlvDq8ikWAM".to_string()), // Rachel
            model_id: "eleven_monolingual_v1".to_string(),
            output_format: "mp3_44100_128".to_string(),
            base_url: "https://api.elevenlabs.io".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ElevenLabsBody {
    text: String,
    model_id: String,
    voice_settings: ElevenLabsVoiceSettings,
}

#[derive(Serialize)]
struct ElevenLabsVoiceSettings {
    stability: f32,
    similarity_boost: f32,
    speed: f32,
}

#[async_trait]
impl TtsProvider for ElevenLabsTts {
    fn name(&self) -> &str {
        "elevenlabs"
    }

    async fn synthesize(&self, req: TtsRequest) -> Result<AudioStream, RingError> {
        let voice_id = req.voice.as_deref().unwrap_or(&self.default_voice_id);
        let url = format!(
            "{}/v1/text-to-speech/{}/stream?output_format={}",
            self.base_url, voice_id, self.output_format
        );
        let body = ElevenLabsBody {
            text: req.text,
            model_id: self.model_id.clone(),
            voice_settings: ElevenLabsVoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
                speed: req.speed,
            },
        };
        info!("[TTS/ElevenLabs] Synthesizing voice_id={}", voice_id);
        let resp = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await;
        into_audio_stream("elevenlabs", resp).await
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

pub enum TtsProviderKind {
    OpenAi {
        api_key: String,
        voice: Option<String>,
        base_url: String,
    },
    ElevenLabs {
        api_key: String,
        voice_id: Option<String>,
        model_id: String,
        output_format: String,
        base_url: String,
    },
}

pub fn create_tts(kind: TtsProviderKind) -> Arc<dyn TtsProvider> {
    match kind {
        TtsProviderKind::OpenAi {
            api_key,
            voice,
            base_url,
        } => {
            let tts = OpenAiTts::new(api_key).with_base_url(base_url);
            match voice {
                Some(voice) => Arc::new(tts.with_voice(voice)),
                None => Arc::new(tts),
            }
        }
        TtsProviderKind::ElevenLabs {
            api_key,
            voice_id,
            model_id,
            output_format,
            base_url,
        } => Arc::new(
            ElevenLabsTts::new(api_key, voice_id)
                .with_model(model_id)
                .with_output_format(output_format)
                .with_base_url(base_url),
        ),
    }
}
