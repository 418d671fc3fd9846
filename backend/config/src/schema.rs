//! ringforge runtime configuration schema.

use serde::{Deserialize, Serialize};

use crate::defaults::*;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for a ringforge process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingConfig {
    pub server: ServerConfig,
    pub telephony: TelephonyConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub cache: CacheConfig,
    pub conversation: ConversationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Absolute URL the telephony vendor can reach this server on.
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelephonyConfig {
    pub auth_id: String,
    pub auth_token: String,
    /// Caller id used for outbound calls.
    pub origin_number: String,
    pub api_base_url: String,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            auth_id: String::new(),
            auth_token: String::new(),
            origin_number: String::new(),
            api_base_url: DEFAULT_PLIVO_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
    /// Overrides the built-in assistant persona when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            temperature: DEFAULT_LLM_TEMPERATURE,
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsConfig {
    /// "elevenlabs" | "openai"
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
    pub timeout_ms: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_TTS_PROVIDER.to_string(),
            api_key: String::new(),
            base_url: DEFAULT_TTS_BASE_URL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_TTS_MODEL.to_string(),
            output_format: DEFAULT_TTS_OUTPUT_FORMAT.to_string(),
            timeout_ms: DEFAULT_TTS_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Local behavior
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    pub reply_capacity: u64,
    pub audio_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reply_capacity: DEFAULT_CACHE_CAPACITY,
            audio_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationConfig {
    pub max_reply_chars: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: DEFAULT_MAX_REPLY_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub audio_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: DEFAULT_AUDIO_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    pub level: String,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}
