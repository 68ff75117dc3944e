//! Scoreboard gate (v1)
//!
//! Request-lifecycle front of a CTF scoreboard, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ trace ─▶ query counter ─▶ security headers ─▶ identity ─▶ handler
//!                                   │                                  │           │
//!                                   │                          session cookie  lightweight
//!                                   │                          (load/persist)    proxies
//!                                   │                                              │
//!                                   └──────── counts ◀──────── identity store ◀────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use scoreboard_gate::config::{load_config, GateConfig};
use scoreboard_gate::observability::{logging, metrics};
use scoreboard_gate::store::{IdentityStore, MemoryStore};
use scoreboard_gate::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "scoreboard-gate")]
#[command(about = "Session, identity and security-header front for the scoreboard", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("scoreboard-gate v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        count_queries = config.observability.count_queries,
        csp_override = config.security.csp_policy.is_some(),
        csp_extend = config.security.extend_csp_policy.is_some(),
        "Configuration loaded"
    );
    if cli.config.is_none() {
        tracing::warn!("No config file given; session secret is the built-in placeholder");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store: Arc<dyn IdentityStore> = match &config.store.seed_path {
        Some(path) => Arc::new(MemoryStore::load_from_file(Path::new(path))?),
        None => Arc::new(MemoryStore::new()),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config, store)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
