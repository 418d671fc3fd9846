//! Config validation: checks that would otherwise surface mid-call.

use crate::schema::RingConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &RingConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_credentials(config, &mut report);
    validate_llm(config, &mut report);
    validate_tts(config, &mut report);
    validate_limits(config, &mut report);
    report
}

fn validate_server(config: &RingConfig, report: &mut ValidationReport) {
    let url = &config.server.public_base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error(
            "server.publicBaseUrl",
            format!("'{url}' must be an absolute http(s) URL"),
        );
    } else if url.contains("://localhost") || url.contains("://127.0.0.1") {
        report.warn(
            "server.publicBaseUrl",
            "Loopback URL; the telephony provider will not be able to reach the webhooks",
        );
    }

    let port = config.server.port;
    if port < 1024 && port != 80 && port != 443 {
        report.warn(
            "server.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        );
    }
}

fn validate_credentials(config: &RingConfig, report: &mut ValidationReport) {
    let checks = [
        ("telephony.authId", &config.telephony.auth_id, "outbound calls will fail"),
        ("telephony.authToken", &config.telephony.auth_token, "outbound calls will fail"),
        ("telephony.originNumber", &config.telephony.origin_number, "outbound calls will fail"),
        ("llm.apiKey", &config.llm.api_key, "every reply will be the fallback phrase"),
        ("tts.apiKey", &config.tts.api_key, "calls will be silent"),
    ];
    for (path, value, consequence) in checks {
        if value.trim().is_empty() {
            report.warn(path, format!("Not set; {consequence}"));
        }
    }
}

fn validate_llm(config: &RingConfig, report: &mut ValidationReport) {
    let llm = &config.llm;
    if llm.model.trim().is_empty() {
        report.error("llm.model", "Model cannot be empty");
    }
    if !(0.0..=2.0).contains(&llm.temperature) {
        report.error("llm.temperature", "Temperature must be between 0 and 2");
    }
    if llm.max_tokens == 0 {
        report.error("llm.maxTokens", "maxTokens must be >= 1");
    }
    if llm.timeout_ms == 0 {
        report.error("llm.timeoutMs", "timeoutMs must be > 0");
    }
}

fn validate_tts(config: &RingConfig, report: &mut ValidationReport) {
    let tts = &config.tts;
    if !matches!(tts.provider.as_str(), "elevenlabs" | "openai") {
        report.error(
            "tts.provider",
            format!("Unknown TTS provider '{}'. Use 'elevenlabs' or 'openai'", tts.provider),
        );
    }
    if tts.voice_id.trim().is_empty() {
        report.error("tts.voiceId", "Voice id cannot be empty");
    }
    if tts.timeout_ms == 0 {
        report.error("tts.timeoutMs", "timeoutMs must be > 0");
    }
}

fn validate_limits(config: &RingConfig, report: &mut ValidationReport) {
    if config.cache.reply_capacity == 0 {
        report.error("cache.replyCapacity", "Capacity must be >= 1");
    }
    if config.cache.audio_capacity == 0 {
        report.error("cache.audioCapacity", "Capacity must be >= 1");
    }
    if config.conversation.max_reply_chars == 0 {
        report.error("conversation.maxReplyChars", "maxReplyChars must be >= 1");
    }
    if config.storage.audio_dir.trim().is_empty() {
        report.error("storage.audioDir", "Audio directory cannot be empty");
    }
}
