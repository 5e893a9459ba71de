//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Name the headers that carry the hostname tag upstream
//! - Prepare request for forwarding to the upstream gateway
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An inbound `X-Request-ID` is kept, not replaced
//! - Client-supplied hostname tag headers are never trusted

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

use crate::hostname::GatewayHostname;

pub const X_REQUEST_ID: &str = "x-request-id";
/// Canonical gateway hostname of a forwarded request.
pub const X_GATEWAY_HOSTNAME: &str = "x-gateway-hostname";
/// `plain`, `dnslink` or `subdomain`.
pub const X_GATEWAY_HOSTNAME_KIND: &str = "x-gateway-hostname-kind";

/// UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuidV4> {
    SetRequestIdLayer::x_request_id(MakeRequestUuidV4)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Request ID of an inbound request, `unknown` if the layer did not run.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Replace any client-supplied hostname tag headers with `tag`.
pub fn apply_hostname_headers(headers: &mut HeaderMap, tag: Option<&GatewayHostname>) {
    headers.remove(X_GATEWAY_HOSTNAME);
    headers.remove(X_GATEWAY_HOSTNAME_KIND);

    let Some(tag) = tag else {
        return;
    };
    match HeaderValue::from_str(&tag.hostname) {
        Ok(value) => {
            headers.insert(X_GATEWAY_HOSTNAME, value);
            headers.insert(
                X_GATEWAY_HOSTNAME_KIND,
                HeaderValue::from_static(tag.kind.as_str()),
            );
        }
        Err(e) => {
            tracing::warn!(hostname = %tag.hostname, error = %e, "Hostname tag is not a valid header value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_is_uuid() {
        let req = Request::new(());
        let id = MakeRequestUuidV4.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_fallback() {
        assert_eq!(request_id(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_hostname_headers_replace_client_values() {
        let mut headers = HeaderMap::new();
        headers.insert(X_GATEWAY_HOSTNAME, HeaderValue::from_static("evil.example"));
        headers.insert(X_GATEWAY_HOSTNAME_KIND, HeaderValue::from_static("plain"));

        apply_hostname_headers(&mut headers, Some(&GatewayHostname::subdomain("dweb.link")));
        assert_eq!(headers[X_GATEWAY_HOSTNAME], "dweb.link");
        assert_eq!(headers[X_GATEWAY_HOSTNAME_KIND], "subdomain");

        apply_hostname_headers(&mut headers, None);
        assert!(headers.get(X_GATEWAY_HOSTNAME).is_none());
        assert!(headers.get(X_GATEWAY_HOSTNAME_KIND).is_none());
    }
}
