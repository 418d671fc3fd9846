//! Assistant identity: who the model speaks as on a call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const MIRAI_PERSONA: &str = "You are Mirai, a friendly voice AI for Iffort, an AI-first tech company. \
Share concise details about Iffort's services (AI/ML solutions, mobile/performance marketing, \
conversational AI) and success stories. Use simple language, focus on results, and keep responses \
under 7 seconds. End with a question like \"Want more details?\" Avoid jargon or hypotheticals. \
If outside Iffort's data, politely decline.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantIdentity {
    pub name: String,
    pub primary_persona: String,
    pub style_overrides: BTreeMap<String, String>,
}

impl Default for AssistantIdentity {
    fn default() -> Self {
        Self::new("Mirai", MIRAI_PERSONA)
    }
}

impl AssistantIdentity {
    pub fn new(name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_persona: persona.into(),
            style_overrides: BTreeMap::new(),
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style_overrides.insert(key.into(), value.into());
        self
    }

    /// Compile the identity into the system prompt sent with every turn.
    pub fn compile(&self) -> String {
        let mut out = self.primary_persona.clone();

        if !self.style_overrides.is_empty() {
            out.push_str("\n\nSTYLE GUIDELINES:\n");
            for (k, v) in &self.style_overrides {
                out.push_str(&format!("- {}: {}\n", k, v));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_is_mirai() {
        let prompt = AssistantIdentity::default().compile();
        assert!(prompt.starts_with("You are Mirai"));
        assert!(prompt.contains("Want more details?"));
        assert!(!prompt.contains("STYLE GUIDELINES"));
    }

    #[test]
    fn style_overrides_are_listed_in_key_order() {
        let prompt = AssistantIdentity::new("Ava", "You are Ava.")
            .with_style("tone", "warm")
            .with_style("length", "short")
            .compile();
        assert_eq!(
            prompt,
            "You are Ava.\n\nSTYLE GUIDELINES:\n- length: short\n- tone: warm\n"
        );
    }
}
