//! Known gateway lookup.
//!
//! # Responsibilities
//! - Store exact gateway hostnames and compiled `*.domain.tld` patterns
//! - Look up the gateway spec for a Host header value
//! - Find `{root}.{ns}.{gateway}` triples for subdomain gateways
//!
//! # Design Decisions
//! - Built once at startup, immutable afterwards (shared via Arc, no locks)
//! - Hostnames are matched case-insensitively (user agents case-fold hosts)
//! - Overlapping wildcards are tried in ascending order of their source
//!   pattern; the first match wins regardless of specificity

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use crate::config::GatewaySpec;
use crate::hostname::classifier::strip_port;
use crate::hostname::error::{GatewayError, GatewayResult};
use crate::hostname::types::Namespace;

#[derive(Debug)]
struct WildcardMatcher {
    pattern: String,
    regex: Regex,
    spec: GatewaySpec,
}

/// Immutable registry of known gateway hostnames.
#[derive(Debug, Default)]
pub struct GatewayRegistry {
    exact: HashMap<String, GatewaySpec>,
    wildcards: Vec<WildcardMatcher>,
}

/// A host of the form `{root_id}.{namespace}.{gateway_host}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdomainMatch<'a> {
    pub spec: &'a GatewaySpec,
    /// Gateway part of the host, as received (may include a port).
    pub gateway_host: String,
    pub namespace: Namespace,
    /// All labels in front of the namespace, joined by `.`.
    pub root_id: String,
}

/// Compile `*.domain.tld` into a matcher for exactly one label followed by
/// the literal suffix and an optional port.
pub fn compile_wildcard(pattern: &str) -> GatewayResult<Regex> {
    let invalid = |reason: &str| GatewayError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let suffix = pattern
        .strip_prefix("*.")
        .ok_or_else(|| invalid("wildcard must be the whole first label"))?;
    if suffix.contains('*') {
        return Err(invalid("only one wildcard label is supported"));
    }
    if suffix.is_empty() || suffix.split('.').any(str::is_empty) {
        return Err(invalid("empty label in suffix"));
    }

    Regex::new(&format!(r"^[^.]+\.{}(?::\d+)?$", regex::escape(suffix)))
        .map_err(|e| invalid(&e.to_string()))
}

impl GatewayRegistry {
    /// Build the registry from configured gateways. Patterns that fail to
    /// compile are dropped with a warning.
    pub fn build(gateways: &BTreeMap<String, GatewaySpec>) -> Self {
        let mut exact = HashMap::new();
        let mut wildcards = Vec::new();

        for (hostname, spec) in gateways {
            let hostname = hostname.to_ascii_lowercase();
            if !hostname.contains('*') {
                exact.insert(hostname, spec.clone());
                continue;
            }
            match compile_wildcard(&hostname) {
                Ok(regex) => wildcards.push(WildcardMatcher {
                    pattern: hostname,
                    regex,
                    spec: spec.clone(),
                }),
                Err(e) => {
                    tracing::warn!(pattern = %hostname, error = %e, "Dropping wildcard gateway hostname");
                }
            }
        }

        wildcards.sort_by(|a, b| a.pattern.cmp(&b.pattern));

        tracing::debug!(
            exact = exact.len(),
            wildcards = wildcards.len(),
            "Gateway registry built"
        );

        Self { exact, wildcards }
    }

    /// Find the spec for `host`: exact match as given, exact match without
    /// port, then wildcard patterns.
    pub fn lookup_host(&self, host: &str) -> Option<&GatewaySpec> {
        let host = host.to_ascii_lowercase();
        if let Some(spec) = self.exact.get(&host) {
            return Some(spec);
        }
        if let Some(spec) = self.exact.get(strip_port(&host)) {
            return Some(spec);
        }
        self.wildcards
            .iter()
            .find(|w| w.regex.is_match(&host))
            .map(|w| &w.spec)
    }

    /// Split `host` into `{root_id}.{namespace}.{gateway_host}` where
    /// `gateway_host` is a known gateway.
    ///
    /// Candidate gateway suffixes are tried longest first. At least one
    /// root label and the namespace label must precede the suffix.
    pub fn lookup_subdomain(&self, host: &str) -> Option<SubdomainMatch<'_>> {
        let labels: Vec<&str> = host.split('.').collect();

        for i in 2..labels.len() {
            let gateway_host = labels[i..].join(".");
            let Some(spec) = self.lookup_host(&gateway_host) else {
                continue;
            };
            let Some(namespace) = Namespace::parse(&labels[i - 1].to_ascii_lowercase()) else {
                continue;
            };
            return Some(SubdomainMatch {
                spec,
                gateway_host,
                namespace,
                root_id: labels[..i - 1].join("."),
            });
        }

        None
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
