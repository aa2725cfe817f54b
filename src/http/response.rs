//! Response construction for the dispatch outcomes the gateway produces itself.
//!
//! # Design Decisions
//! - Maintenance responses use 408, kept for compatibility with existing clients
//! - Error pages carry the proxy failure status (502/503)
//! - Bodies come from [`crate::pages`]; this module only picks status and type

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::http::proxy::ProxyError;
use crate::pages::{self, ApiMaintenance, ErrorContext, MaintenanceContext};
use crate::registry::Service;
use crate::status::BuildInfo;

/// Status used for every maintenance response, JSON or HTML.
pub const MAINTENANCE_STATUS: StatusCode = StatusCode::REQUEST_TIMEOUT;

/// Request details that pages echo back to the client.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub path: String,
    pub hostname: String,
    pub redirect: Option<String>,
}

pub fn api_maintenance(service: &Service, info: BuildInfo) -> Response {
    (MAINTENANCE_STATUS, Json(ApiMaintenance::new(service, info))).into_response()
}

pub fn maintenance_page(service: &Service, request: &PageRequest, info: BuildInfo) -> Response {
    let html = pages::render_maintenance(&MaintenanceContext {
        service,
        path: &request.path,
        hostname: &request.hostname,
        info,
        redirect: request.redirect.as_deref(),
    });
    (MAINTENANCE_STATUS, Html(html)).into_response()
}

pub fn proxy_error_page(
    error: &ProxyError,
    service: &Service,
    request: &PageRequest,
    info: BuildInfo,
) -> Response {
    let status = error.status();
    let details = error.to_string();
    let trace = error.trace();

    let html = pages::render_error(&ErrorContext {
        status,
        title: error.title(),
        message: error.message(),
        details: &details,
        service,
        path: &request.path,
        hostname: &request.hostname,
        info,
        redirect: request.redirect.as_deref(),
        summary: format!("Error connecting to backend: {}", service.host),
        trace: &trace,
        time: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    });
    (status, Html(html)).into_response()
}
