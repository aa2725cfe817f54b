//! Per-request dispatch for the catch-all route.
//!
//! Order, first match wins:
//! 1. API hostname → 408 maintenance JSON
//! 2. Matched service with a backend → proxy, error page on failure
//! 3. Anything else → 408 maintenance page for the matched or default service
//!
//! Static assets and the status endpoints have their own routes and never
//! reach this handler.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    response::Response,
};

use crate::http::request::{query_param, request_hostname, RequestIdExt};
use crate::http::response::{self, PageRequest};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::resolve;

pub async fn dispatch_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();

    let request_id = request.request_id().to_string();
    let page = PageRequest {
        path: request.uri().path().to_string(),
        hostname: request_hostname(&request),
        redirect: query_param(request.uri().query(), "src"),
    };
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let resolution = resolve(&state.registry, &page.hostname);

    tracing::debug!(
        request_id = %request_id,
        hostname = %page.hostname,
        path = %page.path,
        service = %resolution.service.name,
        matched = resolution.matched,
        is_api = resolution.is_api,
        "Resolved request"
    );

    if resolution.is_api {
        let response = response::api_maintenance(resolution.service, state.build);
        metrics::record_dispatch("api_maintenance", response.status().as_u16(), start);
        return response;
    }

    if let Some(backend) = resolution.backend_url() {
        return match state.proxy.forward(backend, request, client_addr).await {
            Ok(response) => {
                metrics::record_dispatch("proxied", response.status().as_u16(), start);
                response
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    service = %resolution.service.name,
                    error = %e,
                    "Proxy error"
                );
                let response =
                    response::proxy_error_page(&e, resolution.service, &page, state.build);
                metrics::record_dispatch("proxy_error", response.status().as_u16(), start);
                response
            }
        };
    }

    let response = response::maintenance_page(resolution.service, &page, state.build);
    metrics::record_dispatch("maintenance_page", response.status().as_u16(), start);
    response
}
