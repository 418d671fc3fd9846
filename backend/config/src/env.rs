//! Environment variable loading.
//!
//! Every field of [`RingConfig`] can be set from the process environment;
//! unset or empty variables keep their defaults. A `.env` file in the working
//! directory is read first when present.

use std::collections::HashMap;
use std::str::FromStr;

use crate::schema::RingConfig;

/// Error returned when a variable is set but cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value {value:?} for env var \"{var_name}\": expected {expected}")]
pub struct EnvParseError {
    pub var_name: String,
    pub value: String,
    pub expected: &'static str,
}

/// Load `.env` (if any) and build the config from the process environment.
pub fn from_env() -> Result<RingConfig, EnvParseError> {
    // A missing .env file is the normal production case.
    let _ = dotenvy::dotenv();
    from_vars(&std::env::vars().collect())
}

/// Build the config from a provided map (useful for testing).
pub fn from_vars(vars: &HashMap<String, String>) -> Result<RingConfig, EnvParseError> {
    let env = EnvReader { vars };
    let mut config = RingConfig::default();

    env.set_string("RINGFORGE_BIND", &mut config.server.bind_address);
    env.set_parsed("RINGFORGE_PORT", &mut config.server.port, "a port number")?;
    env.set_string("BASE_URL", &mut config.server.public_base_url);
    // Trailing slashes would double up when joining callback paths.
    while config.server.public_base_url.ends_with('/') {
        config.server.public_base_url.pop();
    }

    env.set_string("AUTH_ID", &mut config.telephony.auth_id);
    env.set_string("AUTH_TOKEN", &mut config.telephony.auth_token);
    env.set_string("PLIVO_NUMBER", &mut config.telephony.origin_number);
    env.set_string("PLIVO_API_URL", &mut config.telephony.api_base_url);

    env.set_string("OPENAI_API_KEY", &mut config.llm.api_key);
    env.set_string("OPENAI_BASE_URL", &mut config.llm.base_url);
    env.set_string("OPENAI_MODEL", &mut config.llm.model);
    env.set_parsed("LLM_MAX_TOKENS", &mut config.llm.max_tokens, "an integer")?;
    env.set_parsed("LLM_TEMPERATURE", &mut config.llm.temperature, "a number")?;
    env.set_parsed("LLM_TIMEOUT_MS", &mut config.llm.timeout_ms, "milliseconds")?;
    if let Some(prompt) = env.get("SYSTEM_PROMPT") {
        config.llm.system_prompt = Some(prompt.to_string());
    }

    env.set_string("TTS_PROVIDER", &mut config.tts.provider);
    config.tts.provider = config.tts.provider.to_lowercase();
    env.set_string("ELEVENLABS_API_KEY", &mut config.tts.api_key);
    env.set_string("ELEVENLABS_BASE_URL", &mut config.tts.base_url);
    env.set_string("ELEVENLABS_VOICE_ID", &mut config.tts.voice_id);
    env.set_string("ELEVENLABS_MODEL_ID", &mut config.tts.model_id);
    env.set_string("ELEVENLABS_OUTPUT_FORMAT", &mut config.tts.output_format);
    env.set_parsed("TTS_TIMEOUT_MS", &mut config.tts.timeout_ms, "milliseconds")?;

    env.set_parsed("REPLY_CACHE_CAPACITY", &mut config.cache.reply_capacity, "an integer")?;
    env.set_parsed("AUDIO_CACHE_CAPACITY", &mut config.cache.audio_capacity, "an integer")?;
    env.set_parsed(
        "MAX_REPLY_CHARS",
        &mut config.conversation.max_reply_chars,
        "an integer",
    )?;

    env.set_string("AUDIO_DIR", &mut config.storage.audio_dir);

    env.set_string("RUST_LOG", &mut config.logging.level);
    env.set_string("RINGFORGE_LOG_DIR", &mut config.logging.dir);

    Ok(config)
}

struct EnvReader<'a> {
    vars: &'a HashMap<String, String>,
}

impl EnvReader<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn set_string(&self, name: &str, target: &mut String) {
        if let Some(value) = self.get(name) {
            *target = value.to_string();
        }
    }

    fn set_parsed<T: FromStr>(
        &self,
        name: &str,
        target: &mut T,
        expected: &'static str,
    ) -> Result<(), EnvParseError> {
        let Some(value) = self.get(name) else {
            return Ok(());
        };
        *target = value.parse().map_err(|_| EnvParseError {
            var_name: name.to_string(),
            value: value.to_string(),
            expected,
        })?;
        Ok(())
    }
}
