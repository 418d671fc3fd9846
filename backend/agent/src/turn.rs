//! Conversation Turn Controller.
//!
//! One turn: caller speech in, call-control document out. No history is
//! kept; the model only ever sees the system prompt and the current utterance.

use std::sync::Arc;

use logging::{CallEvent, EventLogger};
use ringforge_core::{AudioLocator, Utterance, truncate_chars};
use ringforge_llm::ReplyCache;
use ringforge_telephony::{CallControlDocument, GetInput};
use ringforge_tts::AudioCache;
use tracing::{debug, instrument};

use crate::call_script::CallScript;
use crate::links::CallbackLinks;

pub const DEFAULT_MAX_REPLY_CHARS: usize = 500;

pub struct TurnController {
    replies: Arc<ReplyCache>,
    voices: Arc<AudioCache>,
    links: CallbackLinks,
    script: CallScript,
    max_reply_chars: usize,
}

impl TurnController {
    pub fn new(replies: Arc<ReplyCache>, voices: Arc<AudioCache>, links: CallbackLinks) -> Self {
        Self {
            replies,
            voices,
            links,
            script: CallScript::default(),
            max_reply_chars: DEFAULT_MAX_REPLY_CHARS,
        }
    }

    pub fn with_script(mut self, script: CallScript) -> Self {
        self.script = script;
        self
    }

    pub fn with_max_reply_chars(mut self, max_chars: usize) -> Self {
        self.max_reply_chars = max_chars;
        self
    }

    pub fn links(&self) -> &CallbackLinks {
        &self.links
    }

    pub fn replies(&self) -> &ReplyCache {
        &self.replies
    }

    pub fn voices(&self) -> &AudioCache {
        &self.voices
    }

    /// Document for a freshly answered call: greeting, then speech capture.
    #[instrument(skip(self))]
    pub async fn answer(&self, call_id: &str) -> CallControlDocument {
        EventLogger::log_event(call_id, CallEvent::Answered);
        let locator = self.voices.get_or_synthesize(&self.script.greeting).await;
        self.document(&locator)
    }

    #[instrument(skip_all, fields(call_id = %utterance.call_id))]
    pub async fn handle_turn(&self, utterance: &Utterance) -> CallControlDocument {
        if utterance.is_blank() {
            EventLogger::log_event(&utterance.call_id, CallEvent::EmptyUtterance);
            let locator = self.voices.get_or_synthesize(&self.script.retry_prompt).await;
            return self.document(&locator);
        }

        EventLogger::log_event(
            &utterance.call_id,
            CallEvent::UtteranceReceived {
                text: utterance.text.clone(),
            },
        );

        let reply = self.replies.get_or_generate(&utterance.text).await;
        let spoken = truncate_chars(&reply, self.max_reply_chars);
        if spoken.len() < reply.len() {
            debug!(max_chars = self.max_reply_chars, "Reply truncated for synthesis");
        }
        let locator = self.voices.get_or_synthesize(&spoken).await;

        EventLogger::log_event(
            &utterance.call_id,
            CallEvent::ReplyReady {
                reply: spoken,
                audio: locator.filename().map(str::to_string),
            },
        );
        self.document(&locator)
    }

    /// Play the locator (nothing for silence), then capture speech.
    fn document(&self, locator: &AudioLocator) -> CallControlDocument {
        let mut doc = CallControlDocument::new();
        if let Some(filename) = locator.filename() {
            doc = doc.play(self.links.audio_url(filename));
        }
        doc.get_input(
            GetInput::speech(self.links.process_speech_url()).with_cue(&self.script.beep_cue),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media::AudioStore;
    use ringforge_core::FALLBACK_PHRASE;
    use ringforge_llm::{MockProvider, ReplySettings};
    use ringforge_telephony::{BEEP_CUE_URL, Verb};
    use ringforge_tts::MockTts;

    use crate::call_script::{GREETING, RETRY_PROMPT};

    struct Fixture {
        _dir: tempfile::TempDir,
        llm: Arc<MockProvider>,
        tts: Arc<MockTts>,
        controller: TurnController,
    }

    fn fixture(llm: MockProvider, tts: MockTts) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let llm = Arc::new(llm);
        let tts = Arc::new(tts);
        let replies = Arc::new(ReplyCache::new(
            llm.clone(),
            ReplySettings::new("You are a test."),
            100,
        ));
        let voices = Arc::new(AudioCache::new(tts.clone(), AudioStore::new(dir.path()), 100));
        let controller =
            TurnController::new(replies, voices, CallbackLinks::new("https://bot.example"));
        Fixture {
            _dir: dir,
            llm,
            tts,
            controller,
        }
    }

    fn assert_ends_with_capture(doc: &CallControlDocument) {
        match doc.verbs().last() {
            Some(Verb::GetInput(input)) => {
                assert_eq!(input.action, "https://bot.example/process_speech");
                assert_eq!(input.method, "POST");
                assert_eq!(input.input_type, "speech");
                assert_eq!(input.finish_on_key, "#");
                assert_eq!(input.cues, vec![BEEP_CUE_URL.to_string()]);
            }
            other => panic!("expected speech capture last, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn answer_plays_greeting() {
        let f = fixture(MockProvider::new("llm"), MockTts::new());

        let doc = f.controller.answer("call-1").await;

        assert_eq!(f.tts.texts(), vec![GREETING]);
        let urls = doc.played_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].starts_with("https://bot.example/static/audio/"));
        assert_ends_with_capture(&doc);
        assert_eq!(f.llm.calls(), 0);
    }

    #[tokio::test]
    async fn blank_utterance_plays_retry_without_generation() {
        let f = fixture(MockProvider::new("llm"), MockTts::new());

        let doc = f.controller.handle_turn(&Utterance::new("call-1", "   ")).await;

        assert_eq!(f.llm.calls(), 0);
        assert_eq!(f.controller.replies().entry_count(), 0);
        assert_eq!(f.tts.texts(), vec![RETRY_PROMPT]);
        assert_eq!(doc.played_urls().len(), 1);
        assert_ends_with_capture(&doc);
    }

    #[tokio::test]
    async fn utterance_is_answered_with_synthesized_reply() {
        let f = fixture(
            MockProvider::new("llm").with_response("We build AI products. Want more details?"),
            MockTts::new(),
        );

        let doc = f
            .controller
            .handle_turn(&Utterance::new("call-1", "What does Iffort do?"))
            .await;

        let request = f.llm.last_request().unwrap();
        assert_eq!(request.user_prompt, "What does Iffort do?");
        assert_eq!(
            f.tts.texts(),
            vec!["We build AI products. Want more details?"]
        );
        assert_eq!(doc.played_urls().len(), 1);
        assert_ends_with_capture(&doc);
    }

    #[tokio::test]
    async fn long_reply_is_truncated_before_synthesis() {
        let long_reply = "é".repeat(600);
        let f = fixture(
            MockProvider::new("llm").with_response(long_reply.clone()),
            MockTts::new(),
        );

        f.controller
            .handle_turn(&Utterance::new("call-1", "Tell me everything"))
            .await;

        let texts = f.tts.texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].chars().count(), 500);
        assert!(long_reply.starts_with(&texts[0]));
    }

    #[tokio::test]
    async fn generation_failure_speaks_fallback() {
        let f = fixture(MockProvider::new("llm").failing_first(1), MockTts::new());

        let doc = f
            .controller
            .handle_turn(&Utterance::new("call-1", "Hello?"))
            .await;

        assert_eq!(f.tts.texts(), vec![FALLBACK_PHRASE]);
        assert_eq!(doc.played_urls().len(), 1);
    }

    #[tokio::test]
    async fn silence_goes_straight_to_capture() {
        let f = fixture(MockProvider::new("llm"), MockTts::always_failing());

        let doc = f
            .controller
            .handle_turn(&Utterance::new("call-1", "Hello?"))
            .await;

        assert!(doc.played_urls().is_empty());
        assert_eq!(doc.verbs().len(), 1);
        assert_ends_with_capture(&doc);
    }
}
