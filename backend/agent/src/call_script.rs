//! Fixed phrases spoken on every call.

use ringforge_telephony::BEEP_CUE_URL;

pub const GREETING: &str = "Hi! I'm your AI assistant. How can I help?";
pub const RETRY_PROMPT: &str = "I didn't hear you. Try again.";

#[derive(Debug, Clone)]
pub struct CallScript {
    pub greeting: String,
    pub retry_prompt: String,
    /// Played inside speech capture to signal "talk now".
    pub beep_cue: String,
}

impl Default for CallScript {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            retry_prompt: RETRY_PROMPT.to_string(),
            beep_cue: BEEP_CUE_URL.to_string(),
        }
    }
}
