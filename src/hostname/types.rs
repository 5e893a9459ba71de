//! Hostname gateway types.

use serde::Serialize;
use std::fmt;

/// Content namespace carried in paths (`/ipfs/...`) and subdomains (`{root}.ipfs.{host}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Ipfs,
    Ipns,
    /// Kept for compatibility with older gateways.
    P2p,
    /// Kept for compatibility with older gateways.
    Ipld,
}

impl Namespace {
    /// Parse a namespace token. Only the four lowercase tokens are recognized.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "ipfs" => Some(Self::Ipfs),
            "ipns" => Some(Self::Ipns),
            "p2p" => Some(Self::P2p),
            "ipld" => Some(Self::Ipld),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ipfs => "ipfs",
            Self::Ipns => "ipns",
            Self::P2p => "p2p",
            Self::Ipld => "ipld",
        }
    }

    /// Namespaces whose root identifier may be a peer identity.
    pub fn is_peer_identity(&self) -> bool {
        matches!(self, Self::Ipns | Self::P2p)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content path split into `/{namespace}/{root_id}{remainder}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath<'a> {
    pub namespace: &'a str,
    pub root_id: &'a str,
    /// Everything after the root ID, without the separating slash.
    pub remainder: Option<&'a str>,
}

impl<'a> ContentPath<'a> {
    /// Split a path of the form `/{ns}/{root}[/{rest}]`. The namespace is
    /// returned verbatim; callers decide whether it is recognized.
    pub fn split(path: &'a str) -> Option<Self> {
        let mut parts = path.splitn(4, '/');
        if parts.next() != Some("") {
            return None;
        }
        let namespace = parts.next()?;
        let root_id = parts.next()?;
        Some(Self {
            namespace,
            root_id,
            remainder: parts.next(),
        })
    }
}

/// How the hostname of a forwarded request was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostnameKind {
    /// Known gateway serving content paths.
    Plain,
    /// Host resolved through a DNSLink record.
    #[serde(rename = "dnslink")]
    DnsLink,
    /// Subdomain gateway (`{root}.{ns}.{gateway}`).
    Subdomain,
}

impl HostnameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::DnsLink => "dnslink",
            Self::Subdomain => "subdomain",
        }
    }
}

/// Tag attached to forwarded requests so downstream handlers can tailor
/// caching and Origin policy to the hostname kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayHostname {
    pub kind: HostnameKind,
    /// Canonical gateway hostname (may include a port).
    pub hostname: String,
}

impl GatewayHostname {
    pub fn plain(hostname: impl Into<String>) -> Self {
        Self {
            kind: HostnameKind::Plain,
            hostname: hostname.into(),
        }
    }

    pub fn dnslink(hostname: impl Into<String>) -> Self {
        Self {
            kind: HostnameKind::DnsLink,
            hostname: hostname.into(),
        }
    }

    pub fn subdomain(hostname: impl Into<String>) -> Self {
        Self {
            kind: HostnameKind::Subdomain,
            hostname: hostname.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_tokens() {
        for token in ["ipfs", "ipns", "p2p", "ipld"] {
            assert_eq!(Namespace::parse(token).unwrap().as_str(), token);
        }
        assert_eq!(Namespace::parse("IPFS"), None);
        assert_eq!(Namespace::parse("api"), None);
        assert!(Namespace::Ipns.is_peer_identity());
        assert!(Namespace::P2p.is_peer_identity());
        assert!(!Namespace::Ipfs.is_peer_identity());
    }

    #[test]
    fn test_content_path_split() {
        let path = ContentPath::split("/ipfs/bafy/a/b%20c").unwrap();
        assert_eq!(path.namespace, "ipfs");
        assert_eq!(path.root_id, "bafy");
        assert_eq!(path.remainder, Some("a/b%20c"));

        let bare = ContentPath::split("/ipns/example.com").unwrap();
        assert_eq!(bare.remainder, None);

        assert_eq!(ContentPath::split("/ipfs"), None);
        assert_eq!(ContentPath::split("ipfs/bafy"), None);
    }
}
