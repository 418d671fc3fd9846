//! Public URLs handed to the telephony vendor.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackLinks {
    base_url: String,
}

impl CallbackLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn answer_url(&self) -> String {
        format!("{}/answer", self.base_url)
    }

    pub fn process_speech_url(&self) -> String {
        format!("{}/process_speech", self.base_url)
    }

    pub fn audio_url(&self, filename: &str) -> String {
        format!("{}/static/audio/{}", self.base_url, filename)
    }
}
