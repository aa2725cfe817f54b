//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Load service documents into the registry
//! - Build the HTTP server
//! - Bind the listener
//!
//! Metrics and logging are installed by the binary before calling [`start`],
//! since both are process-global.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validation, ConfigError, GatewayConfig};
use crate::http::GatewayServer;
use crate::registry::{RegistryBuilder, RegistryError};
use crate::status::UpdateError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to build update checker: {0}")]
    Update(#[from] UpdateError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Prepare a server and a bound listener from `config`.
pub async fn start(config: GatewayConfig) -> Result<(GatewayServer, TcpListener), StartupError> {
    validation::validate_config(&config).map_err(ConfigError::Validation)?;

    let registry = RegistryBuilder::from_config(&config.services).build()?;

    let address = config.listener.bind_address.clone();
    let server = GatewayServer::new(config, Arc::new(registry))?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((server, listener))
}
