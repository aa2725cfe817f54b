//! Void maintenance gateway library.
//!
//! Routes incoming requests by hostname to configured backend services,
//! serving maintenance pages and JSON when a service has no backend or is
//! listed as an API host.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pages;
pub mod registry;
pub mod routing;
pub mod status;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use registry::ServiceRegistry;
