//! Static DNSLink records from configuration.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::dnslink::{DnsLinkBackend, DnsLinkError, DnsLinkRecord};

/// In-memory DNSLink table keyed by lowercase name without trailing dot.
#[derive(Debug, Clone, Default)]
pub struct StaticDnsLinkBackend {
    records: HashMap<String, String>,
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

impl StaticDnsLinkBackend {
    pub fn new(records: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|(name, value)| (normalize(&name), value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DnsLinkBackend for StaticDnsLinkBackend {
    async fn get_dnslink_record(&self, name: &str) -> Result<DnsLinkRecord, DnsLinkError> {
        self.records
            .get(&normalize(name))
            .map(|value| DnsLinkRecord {
                value: value.clone(),
            })
            .ok_or_else(|| DnsLinkError::NotFound(name.to_string()))
    }
}
