//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forwarding handler
//! - Wire up middleware (hostname, panic recovery, timeout, request ID, tracing)
//! - Bind server to listener with graceful shutdown
//! - Forward requests to the upstream path gateway with the hostname tag
//!
//! # Design Decisions
//! - One catch-all route; every request passes the hostname middleware
//! - In-flight upstream requests are capped by a semaphore (503 when full)
//! - No retries: the upstream is a local path gateway

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri, Version,
    },
    middleware,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::dnslink::{DnsLinkError, DnsLinkResolver};
use crate::hostname::{GatewayHostname, RequestDispatcher};
use crate::http::middleware::hostname_middleware;
use crate::http::request::{
    apply_hostname_headers, propagate_request_id_layer, request_id, set_request_id_layer,
};
use crate::http::response::{handle_panic, web_error};
use crate::observability::metrics;

/// Errors that can occur while building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream address {address:?}: {reason}")]
    Upstream { address: String, reason: String },

    #[error("failed to initialize DNSLink resolver: {0}")]
    DnsLink(#[from] DnsLinkError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
    pub in_flight: Arc<Semaphore>,
}

/// HTTP server for the hostname gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server around an existing dispatcher.
    pub fn new(
        config: GatewayConfig,
        dispatcher: Arc<RequestDispatcher>,
    ) -> Result<Self, ServerError> {
        let upstream = Authority::from_str(&config.upstream.address).map_err(|e| {
            ServerError::Upstream {
                address: config.upstream.address.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            client,
            upstream,
            in_flight: Arc::new(Semaphore::new(config.listener.max_connections)),
        };

        let router = Self::build_router(&config, state, dispatcher);
        Ok(Self { router, config })
    }

    /// Build the DNSLink resolver and dispatcher from config.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ServerError> {
        let dnslink = DnsLinkResolver::from_config(&config.dnslink)?;
        let dispatcher = Arc::new(RequestDispatcher::from_config(&config.gateway, dnslink));
        tracing::info!(
            gateways = dispatcher.registry().len(),
            no_dnslink = config.gateway.no_dnslink,
            "Hostname dispatcher ready"
        );
        Self::new(config, dispatcher)
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GatewayConfig,
        state: AppState,
        dispatcher: Arc<RequestDispatcher>,
    ) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(middleware::from_fn_with_state(dispatcher, hostname_middleware))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Forward the (possibly rewritten) request to the upstream gateway.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();

    let Ok(_permit) = state.in_flight.clone().try_acquire_owned() else {
        tracing::warn!(request_id = %request_id, "In-flight request limit reached");
        return web_error(StatusCode::SERVICE_UNAVAILABLE, "too many requests in flight");
    };

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
            return web_error(StatusCode::BAD_GATEWAY, "");
        }
    };
    parts.version = Version::HTTP_11;

    let tag = parts.extensions.get::<GatewayHostname>().cloned();
    apply_hostname_headers(&mut parts.headers, tag.as_ref());

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        hostname = ?tag,
        "Forwarding request"
    );

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_upstream(status.as_u16());
            tracing::debug!(
                request_id = %request_id,
                status = %status,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16());
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            web_error(StatusCode::BAD_GATEWAY, "upstream request failed")
        }
    }
}
