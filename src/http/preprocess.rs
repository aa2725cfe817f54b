//! Request preprocessing that runs before routing.
//!
//! # Responsibilities
//! - Compute CORS response headers from the request
//! - Apply the `data` query parameter method/path override
//! - Answer OPTIONS immediately
//!
//! # Design Decisions
//! - Runs outside the router so an overridden path is what gets routed
//! - CORS headers are attached to every response, proxied ones included

use axum::{
    extract::Request,
    http::{
        header::{self, HeaderMap, HeaderValue},
        uri::PathAndQuery,
        Method, StatusCode, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::query_param;

pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const BASE_ALLOWED_HEADERS: [&str; 2] = ["Content-Type", "Authorization"];

/// CORS headers computed from one request.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsHeaders {
    pub fn from_request(headers: &HeaderMap) -> Self {
        let allow_origin = headers
            .get(header::ORIGIN)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(""));

        let requested = headers
            .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
            .and_then(|v| v.to_str().ok());

        let allow_headers = HeaderValue::from_str(&allowed_headers(requested))
            .unwrap_or_else(|_| HeaderValue::from_static("Content-Type, Authorization"));

        Self {
            allow_origin,
            allow_headers,
        }
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
    }
}

/// `Content-Type, Authorization` plus every requested `x-` header, whitespace removed.
pub fn allowed_headers(requested: Option<&str>) -> String {
    let mut allowed: Vec<String> = BASE_ALLOWED_HEADERS.iter().map(|h| h.to_string()).collect();

    for name in requested.unwrap_or_default().split(',') {
        let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() {
            continue;
        }
        if name.to_ascii_lowercase().starts_with("x-") {
            allowed.push(name);
        }
    }

    allowed.join(", ")
}

/// Effective method and path requested through `?data=METHOD|seg|seg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub method: Option<Method>,
    pub path: Option<String>,
}

impl Override {
    pub fn parse(query: Option<&str>) -> Option<Self> {
        let data = query_param(query, "data").filter(|d| !d.is_empty())?;
        let mut segments = data.split('|');

        let method = segments.next().and_then(|m| match Method::from_bytes(m.as_bytes()) {
            Ok(method) => Some(method),
            Err(_) => {
                tracing::warn!(method = %m, "Ignoring invalid override method");
                None
            }
        });

        let rest: Vec<&str> = segments.collect();
        let path = if rest.is_empty() {
            None
        } else {
            let joined = rest.join("/");
            Some(if joined.starts_with('/') {
                joined
            } else {
                format!("/{joined}")
            })
        };

        Some(Self { method, path })
    }

    /// Rewrite the request in place. The query string is kept.
    pub fn apply(self, request: &mut Request) {
        if let Some(method) = self.method {
            *request.method_mut() = method;
        }

        if let Some(path) = self.path {
            match rewrite_path(request.uri(), &path) {
                Some(uri) => *request.uri_mut() = uri,
                None => tracing::warn!(path = %path, "Ignoring unusable override path"),
            }
        }
    }
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let encoded = encode_path(path)?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{encoded}?{query}"),
        None => encoded,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

/// Percent-encode characters that cannot appear in a URI path.
fn encode_path(path: &str) -> Option<String> {
    let mut url = url::Url::parse("http://localhost/").ok()?;
    url.set_path(path);
    Some(url.path().to_string())
}

/// Middleware applied ahead of routing.
pub async fn preprocess(mut request: Request, next: Next) -> Response {
    let cors = CorsHeaders::from_request(request.headers());

    if let Some(rewrite) = Override::parse(request.uri().query()) {
        tracing::debug!(
            method = ?rewrite.method,
            path = ?rewrite.path,
            "Applying method/path override"
        );
        rewrite.apply(&mut request);
    }

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    cors.apply(response.headers_mut());
    response
}
