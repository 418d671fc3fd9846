//! Config defaults: the values a call runs with when the environment is silent.

/// Default HTTP port for the webhook server.
pub const DEFAULT_PORT: u16 = 8765;

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Public URL the telephony vendor calls back on.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8765";

/// Directory synthesized audio is written to and served from.
pub const DEFAULT_AUDIO_DIR: &str = "static/audio";

pub const DEFAULT_PLIVO_API_URL: &str = "https://api.plivo.com";

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Replies must fit in a few seconds of speech.
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 30;
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 2_000;

pub const DEFAULT_TTS_PROVIDER: &str = "elevenlabs";
pub const DEFAULT_TTS_BASE_URL: &str = "https://api.elevenlabs.io";
/// ElevenLabs "Rachel".
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_TTS_MODEL: &str = "eleven_monolingual_v1";
pub const DEFAULT_TTS_OUTPUT_FORMAT: &str = "mp3_44100_128";
pub const DEFAULT_TTS_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_CACHE_CAPACITY: u64 = 100;

/// Longest reply (in characters) handed to speech synthesis.
pub const DEFAULT_MAX_REPLY_CHARS: usize = 500;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";
