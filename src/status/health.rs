//! Liveness endpoint.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub uptime: String,
    pub system: SystemInfo,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, &'static str>,
    pub commit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub workers: usize,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let info = state.build;

    let services = state
        .registry
        .services()
        .iter()
        .map(|s| (s.name.clone(), "configured"))
        .collect();

    let response = HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        version: info.version,
        uptime: format_uptime(state.started_at.elapsed()),
        system: SystemInfo {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            workers: tokio::runtime::Handle::current().metrics().num_workers(),
        },
        services,
        commit: info.commit,
    };

    ([(header::CACHE_CONTROL, "no-cache")], Json(response))
}

/// Compact `1h2m3s` rendering; zero-valued leading units are dropped.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
