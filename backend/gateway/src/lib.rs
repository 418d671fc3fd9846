//! ringforge HTTP gateway
//!
//! Telephony webhooks, the operator call form, health, and synthesized audio.

pub mod control_ui;
pub mod health_api;
pub mod server;
pub mod webhooks;

pub use server::{GatewayState, build_router, start_server};
