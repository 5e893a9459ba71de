//! Hostname middleware.
//!
//! Runs the [`RequestDispatcher`] on every request and applies its
//! decision: redirect, error, or rewrite the URI path and attach the
//! [`GatewayHostname`] tag before calling the inner handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};

use crate::hostname::{Decision, RequestDispatcher, RequestFacts};
use crate::http::response::{not_found, redirect, web_error};
use crate::observability::metrics;

pub async fn hostname_middleware(
    State(dispatcher): State<Arc<RequestDispatcher>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let facts = RequestFacts::from_parts(&parts);
    let decision = dispatcher.dispatch(&facts).await;

    metrics::record_decision(decision.metric_label());
    tracing::debug!(
        host = %facts.host,
        path = %facts.path,
        decision = ?decision,
        "Hostname decision"
    );

    match decision {
        Decision::Redirect { location } => redirect(&location),
        Decision::NotFound => not_found(),
        Decision::BadRequest { message } => web_error(StatusCode::BAD_REQUEST, &message),
        Decision::Forward { path, hostname } => {
            if let Some(path) = path {
                match rewrite_path(&parts.uri, &path) {
                    Ok(uri) => parts.uri = uri,
                    Err(message) => return web_error(StatusCode::BAD_REQUEST, &message),
                }
            }
            if let Some(tag) = hostname {
                parts.extensions.insert(tag);
            }
            next.run(Request::from_parts(parts, body)).await
        }
    }
}

/// Replace the path of `uri`, keeping its query.
fn rewrite_path(uri: &Uri, path: &str) -> Result<Uri, String> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let path_and_query = PathAndQuery::try_from(path_and_query)
        .map_err(|e| format!("invalid rewritten path {path:?}: {e}"))?;

    let mut uri_parts = uri.clone().into_parts();
    uri_parts.path_and_query = Some(path_and_query);
    Uri::from_parts(uri_parts).map_err(|e| format!("invalid rewritten URI: {e}"))
}
