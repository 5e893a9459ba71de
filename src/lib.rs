//! Hostname-aware front end for a content-addressed HTTP gateway.
//!
//! Maps `Host` headers onto gateway behavior: path gateways, subdomain
//! gateways (`{cid}.ipfs.{gateway}`) and DNSLink websites. Requests are
//! redirected to their canonical subdomain form, rejected, or rewritten to
//! a content path and forwarded to an upstream path gateway.

// Core subsystems
pub mod config;
pub mod dnslink;
pub mod hostname;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use hostname::{Decision, RequestDispatcher};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
