//! Single-target reverse proxy.
//!
//! # Responsibilities
//! - Parse the backend URL of a matched service
//! - Rewrite the request URI onto the backend, override `Host`
//! - Forward exactly once and stream the response back
//! - Translate failures into [`ProxyError`] values the dispatcher can render
//!
//! # Design Decisions
//! - No retries and no backoff: one attempt per request
//! - Hop-by-hop headers stripped in both directions
//! - Dropping the returned future aborts the backend request
//! - `http` and `https` targets; TLS is verified against the webpki roots

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::Response,
};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use url::Url;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Headers that apply to a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Why a request could not be proxied.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The configured backend URL is unusable.
    #[error("Error parsing backend URL: {url}\nDetails: {reason}")]
    InvalidBackendConfig { url: String, reason: String },

    /// Connecting to or talking with the backend failed.
    #[error("Error connecting to backend: {target}\nDetails: {source}")]
    BackendUnreachable {
        target: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

impl ProxyError {
    fn invalid(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidBackendConfig {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBackendConfig { .. } => StatusCode::BAD_GATEWAY,
            Self::BackendUnreachable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidBackendConfig { .. } => "Bad Gateway",
            Self::BackendUnreachable { .. } => "Service Unavailable",
        }
    }

    /// Operator-facing explanation shown above the details.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidBackendConfig { .. } => {
                "The backend URL for this service is invalid or misconfigured. \
                 The gateway configuration for this service needs to be fixed."
            }
            Self::BackendUnreachable { .. } => {
                "The backend service is currently unreachable or experiencing issues. \
                 The gateway could not proxy the request; the details below show why."
            }
        }
    }

    /// Source chain of the underlying error, one cause per line. Empty when
    /// there is no underlying error.
    pub fn trace(&self) -> String {
        let mut lines = Vec::new();
        let mut cause = self.source();
        while let Some(err) = cause {
            lines.push(format!("caused by: {err}"));
            cause = err.source();
        }
        lines.join("\n")
    }
}

/// A parsed backend URL.
#[derive(Debug, Clone)]
pub struct BackendTarget {
    raw: String,
    scheme: Scheme,
    authority: Authority,
    path: String,
    query: Option<String>,
}

impl BackendTarget {
    pub fn parse(raw: &str) -> Result<Self, ProxyError> {
        let url = Url::parse(raw).map_err(|e| ProxyError::invalid(raw, e.to_string()))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::invalid(raw, "URL has no host"))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let authority =
            Authority::from_str(&authority).map_err(|e| ProxyError::invalid(raw, e.to_string()))?;
        let scheme =
            Scheme::from_str(url.scheme()).map_err(|e| ProxyError::invalid(raw, e.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            scheme,
            authority,
            path: url.path().to_string(),
            query: url.query().map(str::to_owned),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Value for the outbound `Host` header.
    pub fn host(&self) -> &str {
        self.authority.as_str()
    }

    /// Map an incoming path and query onto this target.
    pub fn rewrite_uri(&self, path: &str, query: Option<&str>) -> Result<Uri, ProxyError> {
        let path = join_paths(&self.path, path);
        let query = match (self.query.as_deref(), query) {
            (Some(t), Some(r)) if !t.is_empty() && !r.is_empty() => Some(format!("{t}&{r}")),
            (Some(t), r) => Some(format!("{t}{}", r.unwrap_or_default())),
            (None, r) => r.map(str::to_owned),
        };
        let path_and_query = match query {
            Some(q) if !q.is_empty() => format!("{path}?{q}"),
            _ => path,
        };

        let path_and_query = PathAndQuery::from_str(&path_and_query)
            .map_err(|e| ProxyError::invalid(&self.raw, e.to_string()))?;

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ProxyError::invalid(&self.raw, e.to_string()))
    }
}

/// Join two paths with exactly one `/` between them.
pub fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_str(name.trim()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

fn set_forwarded_headers(
    headers: &mut HeaderMap,
    original_host: Option<HeaderValue>,
    client_addr: Option<SocketAddr>,
) {
    if let Some(addr) = client_addr {
        let ip = addr.ip().to_string();
        let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(prior) if !prior.is_empty() => format!("{prior}, {ip}"),
            _ => ip,
        };
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }

    if let Some(host) = original_host {
        headers.insert(X_FORWARDED_HOST, host);
    }
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
}

/// Forwards requests to backend URLs over a shared connection pool.
#[derive(Clone)]
pub struct ProxyAdapter {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl ProxyAdapter {
    pub fn new(connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }

    /// Forward `request` to `backend` once.
    pub async fn forward(
        &self,
        backend: &str,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response, ProxyError> {
        let target = BackendTarget::parse(backend)?;

        let (mut parts, body) = request.into_parts();
        parts.uri = target.rewrite_uri(parts.uri.path(), parts.uri.query())?;
        parts.version = Version::HTTP_11;

        let original_host = parts.headers.get(header::HOST).cloned();
        strip_hop_by_hop(&mut parts.headers);
        set_forwarded_headers(&mut parts.headers, original_host, client_addr);

        let host = HeaderValue::from_str(target.host())
            .map_err(|e| ProxyError::invalid(backend, e.to_string()))?;
        parts.headers.insert(header::HOST, host);

        tracing::debug!(target = %target.raw(), uri = %parts.uri, "Forwarding request");

        let response: hyper::Response<Incoming> = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|source| ProxyError::BackendUnreachable {
                target: target.raw().to_string(),
                source,
            })?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
