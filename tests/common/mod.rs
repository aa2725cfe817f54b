//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use void_gateway::config::GatewayConfig;
use void_gateway::lifecycle::{self, Shutdown};

pub const DEFAULT_DOCUMENT: &str = r#"
name: Void
domain: void.example
support: https://void.example/support
status: https://status.void.example
"#;

/// Start a backend that echoes what it received as JSON.
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(request: Request) -> impl IntoResponse {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        Json(json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "query": request.uri().query(),
            "host": header("host"),
            "x_forwarded_for": header("x-forwarded-for"),
            "x_forwarded_host": header("x-forwarded-host"),
            "x_forwarded_proto": header("x-forwarded-proto"),
        }))
    }

    serve(Router::new().fallback(echo)).await
}

/// Start a backend that reads each request body to the end and records the
/// size of every body it received completely.
pub async fn start_body_counting_backend() -> (SocketAddr, Arc<AtomicUsize>) {
    let received = Arc::new(AtomicUsize::new(0));
    let counter = received.clone();

    let app = Router::new().fallback(move |request: Request| {
        let counter = counter.clone();
        async move {
            match request.into_body().collect().await {
                Ok(body) => {
                    let len = body.to_bytes().len();
                    counter.fetch_max(len, Ordering::SeqCst);
                    Json(json!({ "received": len })).into_response()
                }
                Err(_) => StatusCode::BAD_REQUEST.into_response(),
            }
        }
    });

    (serve(app).await, received)
}

/// Start a GitHub-like releases API returning `tag` as the latest release.
pub async fn start_release_api(tag: &'static str) -> SocketAddr {
    let app = Router::new()
        .route(
            "/repos/{owner}/{name}/releases/latest",
            get(move || async move {
                Json(json!({
                    "tag_name": tag,
                    "html_url": format!("https://github.com/owner/repo/releases/tag/{tag}"),
                    "prerelease": false,
                    "draft": false,
                }))
            }),
        )
        .fallback(|| async { StatusCode::NOT_FOUND });

    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Write the default document plus `documents` into a fresh services dir.
pub fn services_dir(documents: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "default.yaml", DEFAULT_DOCUMENT);
    for (name, content) in documents {
        write(dir.path(), name, content);
    }
    dir
}

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// One service entry in document form.
pub fn service_entry(name: &str, host: &str, domain: &str) -> String {
    format!(
        "  - name: {name}\n    host: \"{host}\"\n    domain: {domain}\n    support: https://support.{domain}\n    status: https://status.{domain}\n"
    )
}

pub fn document(services: &[String], api_urls: &[&str]) -> String {
    let mut doc = String::from(if services.is_empty() { "services: []\n" } else { "services:\n" });
    for service in services {
        doc.push_str(service);
    }
    doc.push_str(if api_urls.is_empty() { "apiUrls: []\n" } else { "apiUrls:\n" });
    for url in api_urls {
        doc.push_str(&format!("  - {url}\n"));
    }
    doc
}

/// A gateway running on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
    _services: TempDir,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn test_config(services: &TempDir) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.services.dir = services.path().to_string_lossy().into_owned();
    config.assets.dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets").into();
    config.timeouts.connect_secs = 2;
    config.update.api_base = "http://127.0.0.1:1".into();
    config
}

pub async fn start_gateway(services: TempDir) -> TestGateway {
    let config = test_config(&services);
    start_gateway_with(services, config).await
}

pub async fn start_gateway_with(services: TempDir, config: GatewayConfig) -> TestGateway {
    let (server, listener) = lifecycle::start(config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestGateway {
        addr,
        shutdown,
        handle,
        _services: services,
    }
}

/// Client that never follows redirects or reuses pooled connections between tests.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
