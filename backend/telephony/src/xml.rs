//! Plivo call-control XML.
//!
//! Documents render without an XML declaration; every attribute and text
//! value is escaped.

use std::fmt;

/// Short cue played while waiting for the caller to speak.
pub const BEEP_CUE_URL: &str = "https://actions.google.com/sounds/v1/cartoon/short_beep.ogg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Play(String),
    GetInput(GetInput),
}

/// Speech-capture instruction. The vendor posts the transcript to `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInput {
    pub action: String,
    pub method: String,
    pub input_type: String,
    pub finish_on_key: String,
    pub cues: Vec<String>,
}

impl GetInput {
    pub fn speech(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "POST".to_string(),
            input_type: "speech".to_string(),
            finish_on_key: "#".to_string(),
            cues: Vec::new(),
        }
    }

    pub fn with_cue(mut self, url: impl Into<String>) -> Self {
        self.cues.push(url.into());
        self
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&format!(
            r#"<GetInput action="{}" method="{}" inputType="{}" finishOnKey="{}">"#,
            escape(&self.action),
            escape(&self.method),
            escape(&self.input_type),
            escape(&self.finish_on_key),
        ));
        for cue in &self.cues {
            write_play(out, cue);
        }
        out.push_str("</GetInput>");
    }
}

/// Ordered list of verbs wrapped in `<Response>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallControlDocument {
    verbs: Vec<Verb>,
}

impl CallControlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Play(url.into()));
        self
    }

    pub fn get_input(mut self, input: GetInput) -> Self {
        self.verbs.push(Verb::GetInput(input));
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// URLs of top-level `<Play>` verbs, in order.
    pub fn played_urls(&self) -> Vec<&str> {
        self.verbs
            .iter()
            .filter_map(|verb| match verb {
                Verb::Play(url) => Some(url.as_str()),
                Verb::GetInput(_) => None,
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Play(url) => write_play(&mut out, url),
                Verb::GetInput(input) => input.write_to(&mut out),
            }
        }
        out.push_str("</Response>");
        out
    }
}

impl fmt::Display for CallControlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn write_play(out: &mut String, url: &str) {
    out.push_str("<Play>");
    out.push_str(&escape(url));
    out.push_str("</Play>");
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
