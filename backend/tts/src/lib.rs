pub mod audio_cache;
pub mod engine;
pub mod mock;

pub use audio_cache::{AudioCache, DEFAULT_SYNTHESIS_TIMEOUT};
pub use engine::{
    AudioFormat, ElevenLabsTts, OpenAiTts, TtsProvider, TtsProviderKind, TtsRequest, create_tts,
};
pub use mock::MockTts;
