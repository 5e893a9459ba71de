//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the HTTP server (DNSLink backend, registry, dispatcher)
//! - Bind the listener and start serving in a background task
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::GatewayConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A gateway serving in the background.
#[derive(Debug)]
pub struct RunningGateway {
    pub local_addr: SocketAddr,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

/// Build and start the gateway. It stops when `shutdown` is triggered.
pub async fn start(config: GatewayConfig, shutdown: &Shutdown) -> Result<RunningGateway, StartupError> {
    let address = config.listener.bind_address.clone();
    let server = HttpServer::from_config(config)?;

    let bind_error = |source| StartupError::Bind {
        address: address.clone(),
        source,
    };
    let listener = TcpListener::bind(&address).await.map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));
    Ok(RunningGateway { local_addr, handle })
}
