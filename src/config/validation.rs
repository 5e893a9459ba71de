//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check gateway path prefixes and static DNSLink records
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Malformed wildcard hostnames are NOT errors here: the registry drops
//!   them with a warning so one bad pattern never blocks startup

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::{DnsLinkBackendKind, GatewayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway hostname must not be empty")]
    EmptyHostname,

    #[error("gateway {host:?}: path prefix {path:?} must start with '/'")]
    PathPrefix { host: String, path: String },

    #[error("{field}: invalid address {value:?}")]
    Address { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("dnslink record for {name:?} must point at /ipfs/ or /ipns/, got {value:?}")]
    DnsLinkRecord { name: String, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::Address {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "listener.max_connections",
        });
    }
    if Authority::from_str(&config.upstream.address).is_err() {
        errors.push(ValidationError::Address {
            field: "upstream.address",
            value: config.upstream.address.clone(),
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "timeouts.request_secs",
        });
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "timeouts.connect_secs",
        });
    }
    if config.dnslink.lookup_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "dnslink.lookup_timeout_ms",
        });
    }
    if config.observability.metrics_enabled
        && SocketAddr::from_str(&config.observability.metrics_address).is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (host, spec) in &config.gateway.public_gateways {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyHostname);
        }
        for path in &spec.paths {
            if !path.starts_with('/') {
                errors.push(ValidationError::PathPrefix {
                    host: host.clone(),
                    path: path.clone(),
                });
            }
        }
    }

    if config.dnslink.backend == DnsLinkBackendKind::Static {
        for (name, value) in &config.dnslink.records {
            if !(value.starts_with("/ipfs/") || value.starts_with("/ipns/")) {
                errors.push(ValidationError::DnsLinkRecord {
                    name: name.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::GatewaySpec;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.gateway.public_gateways.insert(
            "dweb.link".into(),
            GatewaySpec {
                paths: vec!["ipfs".into()],
                ..GatewaySpec::default()
            },
        );

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::PathPrefix {
            host: "dweb.link".into(),
            path: "ipfs".into(),
        }));
    }

    #[test]
    fn test_static_records_must_be_content_paths() {
        let mut config = GatewayConfig::default();
        config.dnslink.backend = DnsLinkBackendKind::Static;
        config
            .dnslink
            .records
            .insert("example.com".into(), "bafkqaaa".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::DnsLinkRecord { .. }));
    }

    #[test]
    fn test_bad_wildcard_is_not_fatal() {
        let mut config = GatewayConfig::default();
        config
            .gateway
            .public_gateways
            .insert("foo.*.link".into(), GatewaySpec::default());
        assert_eq!(validate_config(&config), Ok(()));
    }
}
