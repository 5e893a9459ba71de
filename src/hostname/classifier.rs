//! Host header classification.
//!
//! # Responsibilities
//! - Extract routing-relevant facts (effective host, path, query, TLS)
//! - Decide whether a host is a known gateway, a subdomain gateway host,
//!   or unknown
//!
//! # Design Decisions
//! - `X-Forwarded-Host` wins over `Host` (reverse proxies in front)
//! - HTTPS is detected from the URI scheme or `X-Forwarded-Proto`
//! - Path and query stay percent-encoded exactly as received

use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::config::GatewaySpec;
use crate::hostname::registry::{GatewayRegistry, SubdomainMatch};

pub const X_FORWARDED_HOST: &str = "x-forwarded-host";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// What the dispatcher needs to know about an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts {
    /// `X-Forwarded-Host` if present, else `Host`, else the URI authority.
    pub host: String,
    /// Raw request path.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    /// Native TLS or `X-Forwarded-Proto: https`.
    pub is_tls: bool,
}

impl RequestFacts {
    pub fn from_parts(parts: &Parts) -> Self {
        let host = header_str(&parts.headers, X_FORWARDED_HOST)
            .or_else(|| header_str(&parts.headers, header::HOST.as_str()))
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or_default()
            .to_string();

        let is_tls = parts.uri.scheme_str() == Some("https")
            || header_str(&parts.headers, X_FORWARDED_PROTO) == Some("https");

        Self {
            host,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            is_tls,
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Result of matching a host against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass<'a> {
    /// Host is a known gateway (path or subdomain mode).
    KnownGateway(&'a GatewaySpec),
    /// Host is `{root}.{ns}.{gateway}` for a known gateway.
    Subdomain(SubdomainMatch<'a>),
    Unknown,
}

/// Classify `host`; a known gateway match takes precedence over a subdomain triple.
pub fn classify_host<'a>(registry: &'a GatewayRegistry, host: &str) -> HostClass<'a> {
    if let Some(spec) = registry.lookup_host(host) {
        return HostClass::KnownGateway(spec);
    }
    match registry.lookup_subdomain(host) {
        Some(m) => HostClass::Subdomain(m),
        None => HostClass::Unknown,
    }
}

/// Remove a trailing `:port`, including from bracketed IPv6 hosts.
pub fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((inner, tail)) if tail.starts_with(':') => inner,
            _ => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, _)) if !name.contains(':') => name,
        _ => host,
    }
}

/// True if `path` equals one of `prefixes` or lies underneath it.
/// Trailing slashes in configured prefixes are ignored.
pub fn has_prefix(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        let p = prefix.strip_suffix('/').unwrap_or(prefix);
        path == p
            || path
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn parts(req: Request<Body>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("::1"), "::1");
    }

    #[test]
    fn test_has_prefix() {
        let prefixes = vec!["/ipfs".to_string(), "/ipns/".to_string()];
        assert!(has_prefix("/ipfs", &prefixes));
        assert!(has_prefix("/ipfs/bafy", &prefixes));
        assert!(has_prefix("/ipns/example.com", &prefixes));
        assert!(has_prefix("/ipns", &prefixes));
        assert!(!has_prefix("/ipfsx", &prefixes));
        assert!(!has_prefix("/api/v0", &prefixes));
        assert!(!has_prefix("/ipfs/bafy", &[]));
    }

    #[test]
    fn test_facts_prefer_forwarded_host() {
        let req = Request::builder()
            .uri("/ipfs/bafy?format=car")
            .header("Host", "127.0.0.1:8080")
            .header("X-Forwarded-Host", "dweb.link")
            .header("X-Forwarded-Proto", "https")
            .body(Body::empty())
            .unwrap();

        let facts = RequestFacts::from_parts(&parts(req));
        assert_eq!(facts.host, "dweb.link");
        assert_eq!(facts.path, "/ipfs/bafy");
        assert_eq!(facts.query.as_deref(), Some("format=car"));
        assert!(facts.is_tls);
    }

    #[test]
    fn test_facts_plain_http() {
        let req = Request::builder()
            .uri("/")
            .header("Host", "ipfs.io")
            .body(Body::empty())
            .unwrap();

        let facts = RequestFacts::from_parts(&parts(req));
        assert_eq!(facts.host, "ipfs.io");
        assert_eq!(facts.query, None);
        assert!(!facts.is_tls);
    }

    #[test]
    fn test_classify_host() {
        let mut gateways = std::collections::BTreeMap::new();
        gateways.insert("dweb.link".to_string(), GatewaySpec::default());
        let registry = GatewayRegistry::build(&gateways);

        assert!(matches!(
            classify_host(&registry, "dweb.link"),
            HostClass::KnownGateway(_)
        ));
        assert!(matches!(
            classify_host(&registry, "bafy.ipfs.dweb.link"),
            HostClass::Subdomain(_)
        ));
        assert_eq!(classify_host(&registry, "example.org"), HostClass::Unknown);
    }
}
