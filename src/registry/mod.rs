//! Service registry subsystem.
//!
//! # Data Flow
//! ```text
//! services/default.yaml      (fatal on any failure)
//! services/*.yaml, *.yml     (each skipped on failure, name order)
//!     → builder.rs (read, parse, validate, concatenate)
//!     → ServiceRegistry (immutable)
//!     → Arc<ServiceRegistry> shared by every request handler
//! ```
//!
//! # Design Decisions
//! - Built once before the listener binds; never written afterwards
//! - Services kept in load order: first loaded domain wins at lookup
//! - API hostnames stored as a set, matched exactly

pub mod builder;
pub mod service;

use std::collections::HashSet;

pub use builder::{RegistryBuilder, RegistryError};
pub use service::{DefaultService, Service, ServiceDocument};

/// The aggregated, read-only view of every configured service.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: Vec<Service>,
    api_hostnames: HashSet<String>,
    default_service: DefaultService,
    fallback: Service,
}

impl ServiceRegistry {
    /// Assemble a registry from already-loaded parts, preserving service order.
    pub fn new(
        default_service: DefaultService,
        services: Vec<Service>,
        api_hostnames: impl IntoIterator<Item = String>,
    ) -> Self {
        let fallback = Service::from(&default_service);
        Self {
            services,
            api_hostnames: api_hostnames.into_iter().collect(),
            default_service,
            fallback,
        }
    }

    /// Services in load order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn default_service(&self) -> &DefaultService {
        &self.default_service
    }

    /// The default service shaped as a [`Service`] with an empty backend host.
    pub fn fallback_service(&self) -> &Service {
        &self.fallback
    }

    /// First service (in load order) whose domain equals `domain`.
    pub fn find_by_domain(&self, domain: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.domain == domain)
    }

    /// Exact membership test, no domain reduction.
    pub fn is_api_hostname(&self, hostname: &str) -> bool {
        self.api_hostnames.contains(hostname)
    }

    pub fn api_hostname_count(&self) -> usize {
        self.api_hostnames.len()
    }
}
