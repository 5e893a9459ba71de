//! Subdomain redirect URLs.
//!
//! Turns `/{ns}/{root}/{rest}` on `gateway_host` into
//! `{scheme}://{root}.{ns}.{gateway_host}/{rest}`, re-encoding the root so
//! it is a valid, canonical DNS label. Query and fragment are copied
//! byte-for-byte.

use url::Url;

use crate::dnslink::DnsLinkResolver;
use crate::hostname::codec::{
    decode_peer_id, decode_root_id_as_cid, encode_cid_for_subdomain, encode_fqdn_as_label,
    is_domain_name_and_not_peer_id,
};
use crate::hostname::error::{GatewayError, GatewayResult, DNS_LABEL_MAX_LENGTH};
use crate::hostname::types::{ContentPath, Namespace};

/// Inputs for [`build_subdomain_url`].
#[derive(Debug, Clone, Copy)]
pub struct SubdomainRedirect<'a> {
    pub gateway_host: &'a str,
    /// Content path, `/{ns}/{root}[/{rest}]`, percent-encoded as received.
    pub content_path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
    pub is_tls: bool,
    /// Inline DNSLink names into one label even without TLS.
    pub inline_dnslink: bool,
}

/// Build the subdomain URL for a content path.
///
/// `Ok(None)` means no subdomain form applies and the caller should fall
/// through to its default handling.
pub async fn build_subdomain_url(
    req: &SubdomainRedirect<'_>,
    dnslink: &DnsLinkResolver,
) -> GatewayResult<Option<String>> {
    let Some(path) = ContentPath::split(req.content_path) else {
        return Ok(None);
    };
    let Some(ns) = Namespace::parse(path.namespace) else {
        return Ok(None);
    };

    let mut root_id = path.root_id.to_string();

    if ns.is_peer_identity() && !is_domain_name_and_not_peer_id(&root_id) {
        if let Some(cid) = decode_peer_id(&root_id) {
            root_id = cid.to_string();
        }
    }

    if let Some(cid) = decode_root_id_as_cid(&root_id) {
        root_id = encode_cid_for_subdomain(&cid, ns)?;
    } else if ns == Namespace::Ipns
        && (req.inline_dnslink || req.is_tls)
        && root_id.contains('.')
    {
        if dnslink.has_dnslink_record(&root_id).await {
            root_id = encode_fqdn_as_label(&root_id)?;
        }
    } else if ns == Namespace::Ipfs {
        return Ok(None);
    }

    if root_id.is_empty() {
        return Ok(None);
    }
    if root_id.split('.').any(|label| label.len() > DNS_LABEL_MAX_LENGTH) {
        return Err(GatewayError::LabelTooLong {
            kind: "root",
            label: root_id,
        });
    }

    let scheme = if req.is_tls { "https" } else { "http" };
    let origin = format!("{scheme}://{root_id}.{ns}.{}", req.gateway_host);
    Url::parse(&origin)
        .map_err(|e| GatewayError::malformed(format!("invalid subdomain URL {origin:?}: {e}")))?;

    let mut location = origin;
    location.push('/');
    location.push_str(path.remainder.unwrap_or_default());
    if let Some(query) = req.query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    if let Some(fragment) = req.fragment.filter(|f| !f.is_empty()) {
        location.push('#');
        location.push_str(fragment);
    }
    Ok(Some(location))
}
