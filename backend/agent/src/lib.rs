//! Conversation logic for a single phone call.

pub mod assistant_identity;
pub mod call_script;
pub mod links;
pub mod turn;

pub use assistant_identity::AssistantIdentity;
pub use call_script::{CallScript, GREETING, RETRY_PROMPT};
pub use links::CallbackLinks;
pub use turn::{DEFAULT_MAX_REPLY_CHARS, TurnController};
