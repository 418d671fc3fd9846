//! Language-model side of a call: chat-completion providers and the reply cache.

pub mod providers;
pub mod reply_cache;

pub use providers::{MockProvider, OpenAiProvider};
pub use reply_cache::{ReplyCache, ReplySettings};
