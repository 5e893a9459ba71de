//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration for the hostname gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Path gateway that receives rewritten requests.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Known gateway hostnames and the process-wide DNSLink switch.
    pub gateway: HostnameConfig,

    /// DNSLink lookup backend.
    pub dnslink: DnsLinkConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Upstream path gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:8081").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Hostname gateway settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostnameConfig {
    /// Disable DNSLink lookups for hosts that are not known gateways.
    pub no_dnslink: bool,

    /// Known gateways keyed by hostname or `*.domain.tld` pattern.
    pub public_gateways: BTreeMap<String, GatewaySpec>,
}

impl Default for HostnameConfig {
    fn default() -> Self {
        let mut public_gateways = BTreeMap::new();
        public_gateways.insert(
            "localhost".to_string(),
            GatewaySpec {
                use_subdomains: true,
                ..GatewaySpec::default()
            },
        );
        public_gateways.insert("127.0.0.1".to_string(), GatewaySpec::default());
        public_gateways.insert("[::1]".to_string(), GatewaySpec::default());
        Self {
            no_dnslink: false,
            public_gateways,
        }
    }
}

/// Behaviour of a single known gateway hostname.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewaySpec {
    /// Path prefixes served as content paths on this hostname.
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,

    /// Redirect path requests to `{root}.{ns}.{host}` subdomains.
    #[serde(default)]
    pub use_subdomains: bool,

    /// Inline DNSLink names into a single label even over plain HTTP.
    #[serde(default)]
    pub inline_dnslink: bool,

    /// Never fall back to DNSLink for paths outside `paths`.
    #[serde(default)]
    pub no_dnslink: bool,
}

fn default_paths() -> Vec<String> {
    vec!["/ipfs".to_string(), "/ipns".to_string()]
}

impl Default for GatewaySpec {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            use_subdomains: false,
            inline_dnslink: false,
            no_dnslink: false,
        }
    }
}

/// Which DNSLink backend answers TXT lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DnsLinkBackendKind {
    /// The host's system resolver configuration.
    #[default]
    System,
    /// Only the records listed in `dnslink.records`.
    Static,
}

/// DNSLink lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DnsLinkConfig {
    pub backend: DnsLinkBackendKind,

    /// Deadline for a single lookup in milliseconds; expiry counts as "no record".
    pub lookup_timeout_ms: u64,

    /// Static records: domain name to content path (e.g. "/ipfs/bafy...").
    pub records: BTreeMap<String, String>,
}

impl Default for DnsLinkConfig {
    fn default() -> Self {
        Self {
            backend: DnsLinkBackendKind::System,
            lookup_timeout_ms: 2_000,
            records: BTreeMap::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
