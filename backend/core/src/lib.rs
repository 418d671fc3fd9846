pub mod error;
pub mod traits;
pub mod types;

pub use error::RingError;
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
pub use types::{truncate_chars, AudioLocator, AudioStream, Utterance, FALLBACK_PHRASE};
