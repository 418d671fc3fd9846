//! Audio storage for ringforge: the on-disk store synthesized speech is
//! written to, and the HTTP router that serves it back to the telephony provider.

pub mod media_server;
pub mod mime_detect;
pub mod store;

pub use media_server::audio_router;
pub use mime_detect::{detect_mime_type, is_audio};
pub use store::AudioStore;
