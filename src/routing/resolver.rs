//! Hostname to service resolution.
//!
//! # Responsibilities
//! - Reduce a hostname to its root domain (last two labels)
//! - Find the first service registered for that root domain
//! - Flag exact API hostnames independently of the domain match
//!
//! # Design Decisions
//! - Host header used literally: no port stripping, no case folding
//! - Linear scan in load order; registries hold tens of entries
//! - No match is not an error: the default service stands in

use crate::registry::{Service, ServiceRegistry};

/// Outcome of resolving one hostname against the registry.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    /// Matched service, or the default service when nothing matched.
    pub service: &'a Service,
    pub matched: bool,
    /// The exact hostname is listed as an API hostname.
    pub is_api: bool,
}

impl<'a> Resolution<'a> {
    /// Backend URL to proxy to, if the match carries one.
    pub fn backend_url(&self) -> Option<&'a str> {
        if self.matched && !self.service.host.is_empty() {
            Some(self.service.host.as_str())
        } else {
            None
        }
    }
}

/// Last two `.`-separated labels, or the whole hostname when it has two or fewer.
pub fn root_domain(hostname: &str) -> &str {
    let mut dots = hostname.rmatch_indices('.');
    match (dots.next(), dots.next()) {
        (Some(_), Some((idx, _))) => &hostname[idx + 1..],
        _ => hostname,
    }
}

/// Resolve a hostname to the service that should answer it.
pub fn resolve<'a>(registry: &'a ServiceRegistry, hostname: &str) -> Resolution<'a> {
    let root = root_domain(hostname);
    let is_api = registry.is_api_hostname(hostname);

    match registry.find_by_domain(root) {
        Some(service) => Resolution {
            service,
            matched: true,
            is_api,
        },
        None => Resolution {
            service: registry.fallback_service(),
            matched: false,
            is_api,
        },
    }
}
