use std::pin::Pin;

use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::RingError;

/// Spoken whenever a collaborator fails and nothing better is available.
pub const FALLBACK_PHRASE: &str = "Sorry, I had an error.";

/// Chunked audio body as returned by a synthesis provider.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Bytes, RingError>> + Send>>;

/// Where synthesized audio for a piece of text can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "filename", rename_all = "snake_case")]
pub enum AudioLocator {
    /// A file in the shared audio directory.
    File(String),
    /// Nothing could be synthesized; play nothing.
    Silence,
}

impl AudioLocator {
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::File(name) => Some(name),
            Self::Silence => None,
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, Self::Silence)
    }
}

/// One captured piece of caller speech.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Utterance {
    pub call_id: String,
    pub text: String,
}

impl Utterance {
    pub fn new(call_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            text: text.into(),
        }
    }

    /// Empty or whitespace-only speech counts as "didn't hear you".
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Cut `text` to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_utterances() {
        assert!(Utterance::new("c1", "").is_blank());
        assert!(Utterance::new("c1", "  \t\n").is_blank());
        assert!(!Utterance::new("c1", " hi ").is_blank());
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("hello", 500), "hello");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let text = "é".repeat(600);
        let cut = truncate_chars(&text, 500);
        assert_eq!(cut.chars().count(), 500);
        assert_eq!(cut.len(), 1000);
    }

    #[test]
    fn truncate_exact_boundary() {
        let text = "a".repeat(500);
        assert_eq!(truncate_chars(&text, 500), text);
    }

    #[test]
    fn locator_accessors() {
        let file = AudioLocator::File("abc.mp3".into());
        assert_eq!(file.filename(), Some("abc.mp3"));
        assert!(AudioLocator::Silence.is_silence());
        assert_eq!(AudioLocator::Silence.filename(), None);
    }
}
