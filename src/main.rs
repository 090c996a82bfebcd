//! Game Gateway
//!
//! Fronts the game server: admits player WebSocket connections from the
//! production origin, serves the live player count and lets an operator
//! start a reboot countdown.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                     GATEWAY                          │
//!                  │                                                      │
//!  Client ─────────┼─▶ trace / request-id / metrics ─▶ CORS policy ─┐     │
//!                  │                                                 │     │
//!                  │        ┌────────────────┬───────────────┬───────┘     │
//!                  │        ▼                ▼               ▼             │
//!                  │   / /ffa1 /ffa2    /playercount      /reboot          │
//!                  │   (admission)        (count)     (countdown + flag)   │
//!                  │        │                │               │             │
//!                  │        ▼                ▼               ▼             │
//!                  │   ┌──────────────────────────────────────────────┐   │
//!                  │   │          SessionGateway (session hub)        │   │
//!                  │   └──────────────────────────────────────────────┘   │
//!                  └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use game_gateway::config::{self, GatewayConfig};
use game_gateway::lifecycle::{signals, Shutdown};
use game_gateway::observability::{logging, metrics};
use game_gateway::{HttpServer, SessionHub};

#[derive(Parser)]
#[command(name = "game-gateway")]
#[command(about = "Admission and control gateway for the game server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides PORT and the config file).
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "game-gateway starting");

    config::loader::apply_env_overrides(&mut config)?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    tracing::info!(
        port = config.listener.port,
        allowed_origins = ?config.origins.allowed,
        admission_origin = %config.origins.admission,
        trusted_proxies = ?config.client_identity.trusted_proxies,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let hub = Arc::new(SessionHub::new());
    let server = HttpServer::new(config, hub.clone());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::forward_signals(shutdown);

    server.run(listener, server_shutdown).await?;
    hub.close();

    tracing::info!("Shutdown complete");
    Ok(())
}
