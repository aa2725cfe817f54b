//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (preprocessing, tracing, limits, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the routing engine

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::dispatch::dispatch_handler;
use crate::http::preprocess::preprocess;
use crate::http::proxy::ProxyAdapter;
use crate::http::request::MakeRequestUuid;
use crate::registry::ServiceRegistry;
use crate::status::{health_handler, update_check_handler, BuildInfo, UpdateChecker, UpdateError};

/// Path prefix under which static assets are served.
pub const STATIC_PREFIX: &str = "/__voidStatic";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub proxy: ProxyAdapter,
    pub updates: UpdateChecker,
    pub build: BuildInfo,
    pub started_at: Instant,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server over an already-built registry.
    pub fn new(config: GatewayConfig, registry: Arc<ServiceRegistry>) -> Result<Self, UpdateError> {
        let state = AppState {
            registry,
            proxy: ProxyAdapter::new(Duration::from_secs(config.timeouts.connect_secs)),
            updates: UpdateChecker::new(&config.update)?,
            build: BuildInfo::current(),
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Preprocessing wraps the whole inner router so that method and path
    /// overrides are in place before route matching.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let routes = Router::new()
            .route("/health", any(health_handler))
            .route("/healthz", any(health_handler))
            .route("/update-check", any(update_check_handler))
            .nest_service(STATIC_PREFIX, ServeDir::new(&config.assets.dir))
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(CatchPanicLayer::new())
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        Router::new()
            .fallback_service(routes)
            .layer(middleware::from_fn(preprocess))
    }

    /// The fully layered router, for driving the gateway without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DefaultService, Service};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn registry() -> ServiceRegistry {
        let default = DefaultService {
            name: "Void".into(),
            domain: "void.example".into(),
            support: "https://void.example/support".into(),
            status: "https://status.void.example".into(),
        };
        let service = |name: &str, host: &str, domain: &str| Service {
            name: name.into(),
            host: host.into(),
            domain: domain.into(),
            support: format!("https://support.{domain}"),
            status: format!("https://status.{domain}"),
        };
        ServiceRegistry::new(
            default,
            vec![
                service("Broken", "http://bad host", "broken.dev"),
                service("Down", "http://127.0.0.1:1", "down.dev"),
                service("Quiet", "", "quiet.dev"),
            ],
            vec!["api.down.dev".to_string()],
        )
    }

    fn router() -> Router {
        let mut config = GatewayConfig::default();
        config.update.api_base = "http://127.0.0.1:1".into();
        config.timeouts.connect_secs = 1;
        GatewayServer::new(config, Arc::new(registry())).unwrap().router()
    }

    async fn send(request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&body).into_owned())
    }

    fn get(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn unmatched_host_gets_default_page() {
        let (status, headers, body) = send(get("www.nowhere.net", "/page?src=https://back.example")).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(body.contains("https://void.example/support"));
        assert!(body.contains("https://status.void.example"));
        assert!(body.contains("https://back.example"));
        assert!(body.contains("/page"));
    }

    #[tokio::test]
    async fn api_host_gets_json_even_when_service_matches() {
        let (status, headers, body) = send(get("api.down.dev", "/v1/users")).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "This service is down for maintenance...");
        assert_eq!(json["service"]["Name"], "Down");
        assert_eq!(json["service"]["Host"], "http://127.0.0.1:1");
        assert!(json["info"]["Version"].is_string());
        assert!(json["info"]["Commit"].is_string());
    }

    #[tokio::test]
    async fn malformed_backend_is_502() {
        let (status, _, body) = send(get("www.broken.dev", "/")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("http://bad host"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_503() {
        let (status, _, body) = send(get("down.dev", "/")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("http://127.0.0.1:1"));
    }

    #[tokio::test]
    async fn matched_service_without_backend_gets_its_page() {
        let (status, _, body) = send(get("www.quiet.dev", "/")).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(body.contains("https://support.quiet.dev"));
    }

    #[tokio::test]
    async fn options_short_circuits() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/anything")
            .header(header::HOST, "down.dev")
            .header(header::ORIGIN, "https://app.down.dev")
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.down.dev");
    }

    #[tokio::test]
    async fn data_override_to_options_short_circuits() {
        let (status, _, body) = send(get("down.dev", "/?data=OPTIONS")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn data_override_reroutes_path() {
        let (status, _, body) = send(get("down.dev", "/?data=GET%7Chealth")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn cors_headers_on_dispatch_responses() {
        let request = Request::builder()
            .uri("/")
            .header(header::HOST, "www.nowhere.net")
            .header(header::ORIGIN, "https://site.example")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-token, accept")
            .body(Body::empty())
            .unwrap();

        let (_, headers, _) = send(request).await;
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://site.example");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization, x-token"
        );
    }

    #[tokio::test]
    async fn health_lists_services() {
        let (status, headers, body) = send(get("anything", "/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["services"]["Quiet"], "configured");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn update_check_failure_is_503() {
        let (status, _, body) = send(get("anything", "/update-check")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.starts_with("Failed to check for updates:"));
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = GatewayConfig::default();
        config.limits.max_body_bytes = 16;
        let router = GatewayServer::new(config, Arc::new(registry())).unwrap().router();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::HOST, "www.nowhere.net")
            .header(header::CONTENT_LENGTH, "64")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn requests_get_an_id() {
        let (_, headers, _) = send(get("www.nowhere.net", "/")).await;
        assert!(headers.get(crate::http::request::X_REQUEST_ID).is_some());
    }
}
