//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional, --config)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to startup, then to the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so the gateway runs without a file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AssetsConfig, GatewayConfig, LimitsConfig, ListenerConfig, ObservabilityConfig,
    ServicesConfig, TimeoutConfig, UpdateConfig,
};
