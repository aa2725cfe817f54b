//! Maintenance and error page rendering.
//!
//! Handlers build a context value and hand it here; this module owns the
//! markup and the JSON payload shape and nothing else.

mod templates;

use axum::http::StatusCode;
use serde::Serialize;

use crate::registry::Service;
use crate::status::BuildInfo;

pub const API_MAINTENANCE_MESSAGE: &str = "This service is down for maintenance...";

/// JSON body returned to API hostnames.
///
/// Clients read `service` and `info` with capitalized member names, so both
/// are serialized through their own views rather than the document schema.
#[derive(Debug, Serialize)]
pub struct ApiMaintenance<'a> {
    pub message: &'static str,
    pub service: ApiService<'a>,
    pub info: ApiInfo,
}

impl<'a> ApiMaintenance<'a> {
    pub fn new(service: &'a Service, info: BuildInfo) -> Self {
        Self {
            message: API_MAINTENANCE_MESSAGE,
            service: ApiService::from(service),
            info: ApiInfo::from(info),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiService<'a> {
    pub name: &'a str,
    pub host: &'a str,
    pub domain: &'a str,
    pub support: &'a str,
    pub status: &'a str,
}

impl<'a> From<&'a Service> for ApiService<'a> {
    fn from(service: &'a Service) -> Self {
        Self {
            name: &service.name,
            host: &service.host,
            domain: &service.domain,
            support: &service.support,
            status: &service.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiInfo {
    pub version: &'static str,
    pub commit: &'static str,
}

impl From<BuildInfo> for ApiInfo {
    fn from(info: BuildInfo) -> Self {
        Self {
            version: info.version,
            commit: info.commit,
        }
    }
}

/// Input for the HTML maintenance/info page.
#[derive(Debug, Clone)]
pub struct MaintenanceContext<'a> {
    pub service: &'a Service,
    pub path: &'a str,
    pub hostname: &'a str,
    pub info: BuildInfo,
    pub redirect: Option<&'a str>,
}

/// Input for the HTML error page shown when proxying fails.
#[derive(Debug, Clone)]
pub struct ErrorContext<'a> {
    pub status: StatusCode,
    pub title: &'a str,
    pub message: &'a str,
    pub details: &'a str,
    pub service: &'a Service,
    pub path: &'a str,
    pub hostname: &'a str,
    pub info: BuildInfo,
    pub redirect: Option<&'a str>,
    pub summary: String,
    pub trace: &'a str,
    pub time: String,
}

pub fn render_maintenance(ctx: &MaintenanceContext<'_>) -> String {
    fill(
        templates::MAINTENANCE_HTML,
        &[
            ("style_block", Value::Raw(templates::STYLE)),
            ("redirect_block", Value::Raw(&redirect_block(ctx.redirect))),
            ("service_name", Value::Text(&ctx.service.name)),
            ("hostname", Value::Text(ctx.hostname)),
            ("status", Value::Text(&ctx.service.status)),
            ("support", Value::Text(&ctx.service.support)),
            ("path", Value::Text(ctx.path)),
            ("version", Value::Text(ctx.info.version)),
            ("commit", Value::Text(ctx.info.commit)),
        ],
    )
}

pub fn render_error(ctx: &ErrorContext<'_>) -> String {
    let status_code = ctx.status.as_u16().to_string();
    fill(
        templates::ERROR_HTML,
        &[
            ("style_block", Value::Raw(templates::STYLE)),
            ("redirect_block", Value::Raw(&redirect_block(ctx.redirect))),
            ("status_code", Value::Text(&status_code)),
            ("title", Value::Text(ctx.title)),
            ("message", Value::Text(ctx.message)),
            ("details", Value::Text(ctx.details)),
            ("service_name", Value::Text(&ctx.service.name)),
            ("status", Value::Text(&ctx.service.status)),
            ("support", Value::Text(&ctx.service.support)),
            ("summary", Value::Text(&ctx.summary)),
            ("trace", Value::Text(ctx.trace)),
            ("hostname", Value::Text(ctx.hostname)),
            ("path", Value::Text(ctx.path)),
            ("time", Value::Text(&ctx.time)),
            ("version", Value::Text(ctx.info.version)),
            ("commit", Value::Text(ctx.info.commit)),
        ],
    )
}

fn redirect_block(redirect: Option<&str>) -> String {
    match redirect {
        Some(target) if !target.is_empty() => fill(
            templates::REDIRECT_BLOCK,
            &[("redirect", Value::Text(target))],
        ),
        _ => String::new(),
    }
}

enum Value<'a> {
    Text(&'a str),
    Raw(&'a str),
}

fn fill(template: &str, values: &[(&str, Value<'_>)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, Value::Text(v))) => escape_into(&mut out, v),
            Some((_, Value::Raw(v))) => out.push_str(v),
            None => {}
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Service {
        Service {
            name: "Infinity".into(),
            host: "http://10.0.0.1:8080".into(),
            domain: "infinitybots.gg".into(),
            support: "https://discord.gg/infinity".into(),
            status: "https://status.infinitybots.gg".into(),
        }
    }

    #[test]
    fn maintenance_page_carries_links() {
        let service = service();
        let html = render_maintenance(&MaintenanceContext {
            service: &service,
            path: "/bots",
            hostname: "botlist.infinitybots.gg",
            info: BuildInfo::current(),
            redirect: None,
        });

        assert!(html.contains("https://discord.gg/infinity"));
        assert!(html.contains("https://status.infinitybots.gg"));
        assert!(html.contains("botlist.infinitybots.gg"));
        assert!(!html.contains("{{"));
        assert!(!html.contains("sent here from"));
    }

    #[test]
    fn values_are_escaped() {
        let service = service();
        let html = render_maintenance(&MaintenanceContext {
            service: &service,
            path: "/<script>alert(1)</script>",
            hostname: "x",
            info: BuildInfo::current(),
            redirect: Some("\"><b>"),
        });

        assert!(html.contains("/&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&quot;&gt;&lt;b&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn error_page_shows_status_and_details() {
        let service = service();
        let html = render_error(&ErrorContext {
            status: StatusCode::BAD_GATEWAY,
            title: "Bad Gateway",
            message: "misconfigured",
            details: "Error parsing backend URL: http://bad host",
            service: &service,
            path: "/",
            hostname: "infinitybots.gg",
            info: BuildInfo::current(),
            redirect: Some("https://infinitybots.gg/back"),
            summary: "Error connecting to backend: http://bad host".into(),
            trace: "",
            time: "2024-01-01T00:00:00Z".into(),
        });

        assert!(html.contains("502 Bad Gateway"));
        assert!(html.contains("Error parsing backend URL: http://bad host"));
        assert!(html.contains("https://infinitybots.gg/back"));
    }

    #[test]
    fn api_payload_shape() {
        let service = service();
        let json = serde_json::to_value(ApiMaintenance::new(&service, BuildInfo::current())).unwrap();
        assert_eq!(json["message"], API_MAINTENANCE_MESSAGE);
        assert_eq!(json["service"]["Name"], "Infinity");
        assert_eq!(json["service"]["Host"], "http://10.0.0.1:8080");
        assert_eq!(json["service"]["Domain"], "infinitybots.gg");
        assert_eq!(json["service"]["Support"], "https://discord.gg/infinity");
        assert_eq!(json["service"]["Status"], "https://status.infinitybots.gg");
        assert_eq!(json["info"]["Version"], env!("CARGO_PKG_VERSION"));
        assert!(json["info"]["Commit"].is_string());
        assert!(json["service"].get("name").is_none());
    }
}
