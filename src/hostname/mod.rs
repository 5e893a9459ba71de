//! Hostname resolution for content gateways.
//!
//! # Data Flow
//! ```text
//! Request
//!     → classifier.rs (effective host, raw path/query, TLS)
//!     → dispatcher.rs (one terminal Decision)
//!         → registry.rs (known gateways, wildcard patterns, subdomain triples)
//!         → redirect.rs (subdomain URL for a content path)
//!             → codec.rs (CID / peer ID / FQDN label encodings)
//!         → dnslink (TXT lookups, fail closed)
//!     → http::middleware::hostname (301 / 404 / 400 / rewrite + tag)
//! ```
//!
//! # Design Decisions
//! - Registry is immutable after startup
//! - Decisions are plain values so they can be explained offline (gateway-cli)

pub mod classifier;
pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod redirect;
pub mod registry;
pub mod types;

pub use classifier::RequestFacts;
pub use dispatcher::{Decision, RequestDispatcher};
pub use error::{GatewayError, GatewayResult};
pub use registry::GatewayRegistry;
pub use types::{GatewayHostname, HostnameKind, Namespace};
