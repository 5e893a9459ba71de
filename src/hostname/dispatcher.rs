//! Per-request hostname decision.
//!
//! # Responsibilities
//! - Evaluate the hostname states in order, first match wins:
//!   1. protocol handler redirect (`/ipfs/?uri=ipfs://...`)
//!   2. known gateway + allowed path → subdomain redirect or plain forward
//!   3. known gateway + other path → DNSLink rewrite or 404
//!   4. `{root}.{ns}.{gateway}` → canonicalization redirect or rewrite
//!   5. unknown host with DNSLink → rewrite
//!   6. anything else → forward untouched
//! - Produce exactly one terminal [`Decision`] per request
//!
//! # Design Decisions
//! - Stateless across requests; only DNSLink lookups suspend
//! - Canonical subdomain form (CIDv1, base, libp2p-key codec) is computed
//!   in one pass so a request is redirected at most once
//! - `LabelTooLong` on a path request disables the subdomain redirect
//!   instead of failing the request

use serde::Serialize;
use url::Url;

use crate::config::HostnameConfig;
use crate::dnslink::DnsLinkResolver;
use crate::hostname::classifier::{classify_host, has_prefix, strip_port, HostClass, RequestFacts};
use crate::hostname::codec::{decode_label_as_fqdn, decode_root_id_as_cid, encode_cid_for_subdomain};
use crate::hostname::error::{GatewayError, GatewayResult};
use crate::hostname::redirect::{build_subdomain_url, SubdomainRedirect};
use crate::hostname::registry::{GatewayRegistry, SubdomainMatch};
use crate::hostname::types::{GatewayHostname, HostnameKind, Namespace};

/// Longest cause message returned in a 400 body.
pub const MAX_ERROR_MESSAGE_LEN: usize = 1024;

/// Terminal action for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// 301 to `location`.
    Redirect { location: String },
    /// Hand the request to the next handler, optionally with a new path
    /// (query preserved) and a hostname tag.
    Forward {
        path: Option<String>,
        hostname: Option<GatewayHostname>,
    },
    NotFound,
    BadRequest { message: String },
}

impl Decision {
    fn bad_request(err: &GatewayError) -> Self {
        let mut message = err.to_string();
        if message.len() > MAX_ERROR_MESSAGE_LEN {
            let mut end = MAX_ERROR_MESSAGE_LEN;
            while !message.is_char_boundary(end) {
                end -= 1;
            }
            message.truncate(end);
        }
        Decision::BadRequest { message }
    }

    fn passthrough() -> Self {
        Decision::Forward {
            path: None,
            hostname: None,
        }
    }

    /// Label used for the decision counter.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Decision::Redirect { .. } => "redirect",
            Decision::Forward { hostname: None, .. } => "passthrough",
            Decision::Forward {
                hostname: Some(h), ..
            } => match h.kind {
                HostnameKind::Plain => "forward_plain",
                HostnameKind::DnsLink => "forward_dnslink",
                HostnameKind::Subdomain => "forward_subdomain",
            },
            Decision::NotFound => "not_found",
            Decision::BadRequest { .. } => "bad_request",
        }
    }
}

/// Hostname decision engine shared by all requests.
#[derive(Debug)]
pub struct RequestDispatcher {
    registry: GatewayRegistry,
    dnslink: DnsLinkResolver,
    no_dnslink: bool,
}

impl RequestDispatcher {
    pub fn new(registry: GatewayRegistry, dnslink: DnsLinkResolver, no_dnslink: bool) -> Self {
        Self {
            registry,
            dnslink,
            no_dnslink,
        }
    }

    pub fn from_config(config: &HostnameConfig, dnslink: DnsLinkResolver) -> Self {
        Self::new(
            GatewayRegistry::build(&config.public_gateways),
            dnslink,
            config.no_dnslink,
        )
    }

    pub fn registry(&self) -> &GatewayRegistry {
        &self.registry
    }

    /// Decide what to do with a request.
    pub async fn dispatch(&self, facts: &RequestFacts) -> Decision {
        if let Some(decision) = protocol_handler_redirect(facts) {
            return decision;
        }

        match classify_host(&self.registry, &facts.host) {
            HostClass::KnownGateway(spec) => {
                if has_prefix(&facts.path, &spec.paths) {
                    self.known_gateway_path(spec.use_subdomains, spec.inline_dnslink, facts)
                        .await
                } else if !spec.no_dnslink && self.dnslink.has_dnslink_record(&facts.host).await {
                    dnslink_rewrite(facts)
                } else {
                    Decision::NotFound
                }
            }
            HostClass::Subdomain(m) => self.subdomain(m, facts).await,
            HostClass::Unknown => {
                if !self.no_dnslink && self.dnslink.has_dnslink_record(&facts.host).await {
                    dnslink_rewrite(facts)
                } else {
                    Decision::passthrough()
                }
            }
        }
    }

    async fn known_gateway_path(
        &self,
        use_subdomains: bool,
        inline_dnslink: bool,
        facts: &RequestFacts,
    ) -> Decision {
        if use_subdomains {
            let req = SubdomainRedirect {
                gateway_host: &facts.host,
                content_path: &facts.path,
                query: facts.query.as_deref(),
                fragment: None,
                is_tls: facts.is_tls,
                inline_dnslink,
            };
            match build_subdomain_url(&req, &self.dnslink).await {
                Ok(Some(location)) => return Decision::Redirect { location },
                Ok(None) => {}
                Err(e) if e.is_label_too_long() => {
                    tracing::debug!(host = %facts.host, path = %facts.path, error = %e, "Serving path request without subdomain redirect");
                }
                Err(e) => return Decision::bad_request(&e),
            }
        }

        Decision::Forward {
            path: None,
            hostname: Some(GatewayHostname::plain(facts.host.as_str())),
        }
    }

    async fn subdomain(&self, m: SubdomainMatch<'_>, facts: &RequestFacts) -> Decision {
        let SubdomainMatch {
            spec,
            gateway_host,
            namespace,
            root_id,
        } = m;

        let mut prefix = format!("/{namespace}/{root_id}");
        if !(spec.use_subdomains && has_prefix(&prefix, &spec.paths)) {
            return Decision::NotFound;
        }

        if let Some(cid) = decode_root_id_as_cid(&root_id) {
            let canonical = match encode_cid_for_subdomain(&cid, namespace) {
                Ok(label) => label,
                Err(e) => return Decision::bad_request(&e),
            };
            if canonical != root_id {
                let content_path = format!("/{namespace}/{canonical}{}", facts.path);
                let req = SubdomainRedirect {
                    gateway_host: &gateway_host,
                    content_path: &content_path,
                    query: facts.query.as_deref(),
                    fragment: None,
                    is_tls: facts.is_tls,
                    inline_dnslink: spec.inline_dnslink,
                };
                match build_subdomain_url(&req, &self.dnslink).await {
                    Ok(Some(location)) => return Decision::Redirect { location },
                    Ok(None) => {}
                    Err(e) => return Decision::bad_request(&e),
                }
            }
        } else if namespace == Namespace::Ipns
            && !root_id.contains('.')
            && !self.dnslink.has_dnslink_record(&root_id).await
        {
            let fqdn = decode_label_as_fqdn(&root_id);
            if self.dnslink.has_dnslink_record(&fqdn).await {
                prefix = format!("/ipns/{fqdn}");
            }
        }

        Decision::Forward {
            path: Some(format!("{prefix}{}", facts.path)),
            hostname: Some(GatewayHostname::subdomain(gateway_host)),
        }
    }
}

fn dnslink_rewrite(facts: &RequestFacts) -> Decision {
    Decision::Forward {
        path: Some(format!("/ipns/{}{}", strip_port(&facts.host), facts.path)),
        hostname: Some(GatewayHostname::dnslink(facts.host.as_str())),
    }
}

/// `/ipfs/?uri=ipfs://{cid}/...` as registered by browser protocol handlers.
fn protocol_handler_redirect(facts: &RequestFacts) -> Option<Decision> {
    if !matches!(facts.path.as_str(), "/ipfs" | "/ipfs/" | "/ipns" | "/ipns/") {
        return None;
    }
    let query = facts.query.as_deref()?;
    let uri = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "uri")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())?;

    Some(match protocol_handler_target(&uri) {
        Ok(location) => Decision::Redirect { location },
        Err(e) => Decision::bad_request(&e),
    })
}

fn protocol_handler_target(uri: &str) -> GatewayResult<String> {
    let url = Url::parse(uri)
        .map_err(|e| GatewayError::malformed(format!("failed to parse uri query parameter: {e}")))?;
    if url.scheme() != "ipfs" && url.scheme() != "ipns" {
        return Err(GatewayError::malformed(format!(
            "uri query parameter scheme must be ipfs or ipns: {uri:?}"
        )));
    }
    let root = url.host_str().unwrap_or_default();
    if root.is_empty() {
        return Err(GatewayError::malformed(format!(
            "uri query parameter has no root identifier: {uri:?}"
        )));
    }

    let mut target = format!("/{}/{root}{}", url.scheme(), url.path());
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Ok(target)
}
