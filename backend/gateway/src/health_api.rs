//! Gateway Health API
//!
//! The server only starts after credentials are bootstrapped, so a 200 here
//! means the process is ready to serve webhooks.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub channels: Vec<String>,
}

/// Handler for `GET /healthz`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
        channels: state.channels.as_ref().clone(),
    })
}
