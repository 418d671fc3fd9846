//! Telemetry and structured logging components for ringforge.
//!
//! Handles log redaction, JSON file output with rotation, and per-call event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CallEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
