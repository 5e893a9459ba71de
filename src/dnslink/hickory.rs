//! DNSLink TXT lookups through the system resolver.

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;

use crate::dnslink::{DnsLinkBackend, DnsLinkError, DnsLinkRecord};

/// Resolves `_dnslink.{name}` first, then `{name}`.
#[derive(Clone)]
pub struct HickoryDnsLinkBackend {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsLinkBackend {
    /// Use the host's resolver configuration (`/etc/resolv.conf` on Unix).
    pub fn from_system_conf() -> Result<Self, DnsLinkError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| DnsLinkError::Resolve(e.to_string()))?;
        Ok(Self::new(resolver))
    }

    pub fn new(resolver: TokioAsyncResolver) -> Self {
        Self { resolver }
    }

    async fn lookup_txt(&self, name: String) -> Result<Option<DnsLinkRecord>, DnsLinkError> {
        let lookup = match self.resolver.txt_lookup(name).await {
            Ok(lookup) => lookup,
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                return Ok(None)
            }
            Err(e) => return Err(DnsLinkError::Resolve(e.to_string())),
        };

        Ok(lookup.iter().find_map(|txt| {
            let text: String = txt
                .txt_data()
                .iter()
                .map(|chunk| String::from_utf8_lossy(chunk))
                .collect();
            DnsLinkRecord::from_txt(&text)
        }))
    }
}

#[async_trait]
impl DnsLinkBackend for HickoryDnsLinkBackend {
    async fn get_dnslink_record(&self, name: &str) -> Result<DnsLinkRecord, DnsLinkError> {
        let name = name.trim_end_matches('.');
        if let Some(record) = self.lookup_txt(format!("_dnslink.{name}.")).await? {
            return Ok(record);
        }
        self.lookup_txt(format!("{name}."))
            .await?
            .ok_or_else(|| DnsLinkError::NotFound(name.to_string()))
    }
}
