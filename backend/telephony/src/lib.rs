//! Telephony side of ringforge: call-control documents and outbound calls.

pub mod initiator;
pub mod mock;
pub mod plivo;
pub mod voice_call;
pub mod xml;

pub use initiator::CallInitiator;
pub use mock::MockCallProvider;
pub use plivo::PlivoClient;
pub use voice_call::{CallProvider, OriginateRequest, OutboundCall};
pub use xml::{BEEP_CUE_URL, CallControlDocument, GetInput, Verb};
