//! Subdomain gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ hostname middleware ──▶ proxy handler ──▶ upstream
//!                                        │        │                               path gateway
//!                                        │        └── dnslink (TXT lookups)
//!                                        └── 301 / 404 / 400
//!
//!     Cross-cutting: config (TOML), observability (tracing, Prometheus),
//!                    lifecycle (startup, signals, graceful shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;

use subdomain_gateway::config::{load_config, GatewayConfig};
use subdomain_gateway::lifecycle::{self, signals, Shutdown};
use subdomain_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "subdomain-gateway")]
#[command(about = "Hostname-aware front end for a content gateway", long_about = None)]
struct Args {
    /// Path to the TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        gateways = config.gateway.public_gateways.len(),
        "subdomain-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let gateway = lifecycle::start(config, &shutdown).await?;
    signals::spawn_signal_listener(shutdown.clone());

    gateway.handle.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
