//! `ringforge-config`: runtime configuration for ringforge.
//!
//! Provides:
//! - Typed config schema (server, telephony, LLM, TTS, caches, storage, logging)
//! - Environment (and `.env`) loading with typed parse errors
//! - Default values
//! - Validation with user-friendly messages
//! - Redaction for safe printing and logging

pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{from_env, from_vars, EnvParseError};
pub use redact::redact;
pub use schema::{
    CacheConfig, ConversationConfig, LlmConfig, LoggingConfig, RingConfig, ServerConfig,
    StorageConfig, TelephonyConfig, TtsConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Validate a loaded config, logging every finding, and refuse to continue on errors.
///
/// Call this after the logger is installed so the findings are recorded.
pub fn prepare(config: RingConfig) -> Result<RingConfig> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("configuration has {} error(s)", report.errors.len());
    }
    Ok(config)
}

/// The effective config with secrets and phone numbers masked.
pub fn redacted_snapshot(config: &RingConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}
