//! Gateway Health API

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub replies: u64,
    pub audio: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub uptime_seconds: u64,
    pub cache_entries: CacheHealth,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    let controller = &state.controller;
    Json(HealthReport {
        status: "ok".into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cache_entries: CacheHealth {
            replies: controller.replies().entry_count(),
            audio: controller.voices().entry_count(),
        },
        timestamp: Utc::now(),
    })
}
