//! DNSLink lookups.
//!
//! # Data Flow
//! ```text
//! dispatcher asks "does {host} have DNSLink?"
//!     → DnsLinkResolver::has_dnslink_record (strip port, reject non-names)
//!     → DnsLinkBackend::get_dnslink_record under a deadline
//!         → hickory.rs (TXT lookup via system resolver)
//!         → table.rs (static records from config)
//!     → bool
//! ```
//!
//! # Design Decisions
//! - Fail closed: errors, timeouts and misses all mean "no record"
//! - Every lookup has a deadline; dropping the request future cancels it
//! - No retries here; retry policy belongs to the backend

pub mod hickory;
pub mod table;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{DnsLinkBackendKind, DnsLinkConfig};
use crate::hostname::classifier::strip_port;
use crate::hostname::codec::is_domain_name_and_not_peer_id;
use crate::observability::metrics;

pub use hickory::HickoryDnsLinkBackend;
pub use table::StaticDnsLinkBackend;

/// A resolved DNSLink record, e.g. `/ipfs/bafy...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsLinkRecord {
    pub value: String,
}

impl DnsLinkRecord {
    /// Parse a TXT string of the form `dnslink=/ipfs/...`.
    pub fn from_txt(txt: &str) -> Option<Self> {
        let value = txt.trim().strip_prefix("dnslink=")?.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
        })
    }
}

/// Errors that can occur during a DNSLink lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsLinkError {
    #[error("no DNSLink record for {0}")]
    NotFound(String),

    #[error("resolver error: {0}")]
    Resolve(String),

    #[error("lookup timed out after {0} ms")]
    Timeout(u64),
}

/// Source of DNSLink records.
#[async_trait]
pub trait DnsLinkBackend: Send + Sync {
    /// Look up the DNSLink record for `name` (no port).
    async fn get_dnslink_record(&self, name: &str) -> Result<DnsLinkRecord, DnsLinkError>;
}

/// Deadline-bounded, fail-closed front end for a [`DnsLinkBackend`].
#[derive(Clone)]
pub struct DnsLinkResolver {
    backend: Arc<dyn DnsLinkBackend>,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for DnsLinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsLinkResolver")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl DnsLinkResolver {
    pub fn new(backend: Arc<dyn DnsLinkBackend>, lookup_timeout: Duration) -> Self {
        Self {
            backend,
            lookup_timeout,
        }
    }

    /// Build the backend selected in config.
    pub fn from_config(config: &DnsLinkConfig) -> Result<Self, DnsLinkError> {
        let backend: Arc<dyn DnsLinkBackend> = match config.backend {
            DnsLinkBackendKind::System => Arc::new(HickoryDnsLinkBackend::from_system_conf()?),
            DnsLinkBackendKind::Static => Arc::new(StaticDnsLinkBackend::new(
                config
                    .records
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            )),
        };
        Ok(Self::new(
            backend,
            Duration::from_millis(config.lookup_timeout_ms),
        ))
    }

    /// Look up the record for `host` (port stripped) under the deadline.
    pub async fn lookup(&self, host: &str) -> Result<DnsLinkRecord, DnsLinkError> {
        let name = strip_port(host);
        if !is_domain_name_and_not_peer_id(name) {
            return Err(DnsLinkError::NotFound(name.to_string()));
        }
        match tokio::time::timeout(self.lookup_timeout, self.backend.get_dnslink_record(name)).await
        {
            Ok(result) => result,
            Err(_) => Err(DnsLinkError::Timeout(self.lookup_timeout.as_millis() as u64)),
        }
    }

    /// True only if a record was positively found in time.
    pub async fn has_dnslink_record(&self, host: &str) -> bool {
        match self.lookup(host).await {
            Ok(record) => {
                tracing::debug!(host = %host, record = %record.value, "DNSLink record found");
                metrics::record_dnslink_lookup("found");
                true
            }
            Err(DnsLinkError::NotFound(_)) => {
                metrics::record_dnslink_lookup("absent");
                false
            }
            Err(e) => {
                tracing::debug!(host = %host, error = %e, "DNSLink lookup failed; treating as absent");
                metrics::record_dnslink_lookup("error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowBackend;

    #[async_trait]
    impl DnsLinkBackend for SlowBackend {
        async fn get_dnslink_record(&self, _name: &str) -> Result<DnsLinkRecord, DnsLinkError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(DnsLinkRecord {
                value: "/ipfs/bafkqaaa".into(),
            })
        }
    }

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DnsLinkBackend for CountingBackend {
        async fn get_dnslink_record(&self, name: &str) -> Result<DnsLinkRecord, DnsLinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DnsLinkError::Resolve(format!("SERVFAIL for {name}")))
        }
    }

    fn table(records: &[(&str, &str)]) -> DnsLinkResolver {
        let backend = StaticDnsLinkBackend::new(
            records
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        DnsLinkResolver::new(Arc::new(backend), Duration::from_secs(1))
    }

    #[test]
    fn test_record_from_txt() {
        assert_eq!(
            DnsLinkRecord::from_txt("dnslink=/ipfs/bafkqaaa").unwrap().value,
            "/ipfs/bafkqaaa"
        );
        assert!(DnsLinkRecord::from_txt("v=spf1 -all").is_none());
        assert!(DnsLinkRecord::from_txt("dnslink=").is_none());
    }

    #[tokio::test]
    async fn test_port_is_stripped() {
        let resolver = table(&[("example.com", "/ipfs/bafkqaaa")]);
        assert!(resolver.has_dnslink_record("example.com:8080").await);
        assert!(!resolver.has_dnslink_record("other.com").await);
    }

    #[tokio::test]
    async fn test_timeout_is_absent() {
        let resolver = DnsLinkResolver::new(Arc::new(SlowBackend), Duration::from_millis(20));
        assert!(!resolver.has_dnslink_record("example.com").await);
        assert_eq!(
            resolver.lookup("example.com").await,
            Err(DnsLinkError::Timeout(20))
        );
    }

    #[tokio::test]
    async fn test_errors_are_absent() {
        let backend = Arc::new(CountingBackend::default());
        let resolver = DnsLinkResolver::new(backend.clone(), Duration::from_secs(1));
        assert!(!resolver.has_dnslink_record("example.com").await);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_names_skip_backend() {
        let backend = Arc::new(CountingBackend::default());
        let resolver = DnsLinkResolver::new(backend.clone(), Duration::from_secs(1));
        assert!(!resolver.has_dnslink_record("").await);
        assert!(!resolver.has_dnslink_record("QmUNLLsPACCz1vLxQVkXqqLX5R1X345qqfHbsf67hvA3Nn").await);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
