//! Void maintenance gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────────────┐
//!                              │                     GATEWAY                           │
//!                              │                                                       │
//!     Client Request           │  ┌────────────┐   ┌─────────┐   ┌───────────┐        │
//!     ─────────────────────────┼─▶│ preprocess │──▶│ router  │──▶│ dispatch  │        │
//!                              │  │ CORS/data  │   │ /health │   │ resolve   │        │
//!                              │  └────────────┘   │ static  │   └─────┬─────┘        │
//!                              │                   └─────────┘         │              │
//!                              │                          ┌────────────┼──────────┐   │
//!                              │                          ▼            ▼          ▼   │
//!     Client Response          │                   ┌──────────┐ ┌──────────┐ ┌──────┐ │
//!     ◀────────────────────────┼───────────────────│ API JSON │ │  proxy   │ │ page │ │──── Backend
//!                              │                   └──────────┘ └──────────┘ └──────┘ │
//!                              │                                                       │
//!                              │  ┌──────────────────────────────────────────────────┐ │
//!                              │  │  config │ registry │ observability │ lifecycle   │ │
//!                              │  └──────────────────────────────────────────────────┘ │
//!                              └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use void_gateway::config;
use void_gateway::lifecycle::{self, Shutdown};
use void_gateway::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "void-gateway", version, about = "Hostname-routed maintenance gateway")]
struct Cli {
    /// Path to the gateway TOML config. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        services_dir = %config.services.dir,
        request_timeout_secs = config.timeouts.request_secs,
        "void-gateway starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let (server, listener) = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(lifecycle::wait_for_signal(shutdown));

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
