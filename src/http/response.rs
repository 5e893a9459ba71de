//! Response helpers.
//!
//! # Responsibilities
//! - Build 301 redirects with a raw `Location`
//! - Build plain-text error responses (400, 404, 502, 503)
//! - Turn handler panics into a generic 500
//!
//! # Design Decisions
//! - Error bodies are plain text, one line
//! - Panic payloads are logged, never sent to the client

use std::any::Any;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// 301 to `location`. An unencodable location becomes a 400.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
        Err(_) => web_error(
            StatusCode::BAD_REQUEST,
            &format!("invalid redirect location {location:?}"),
        ),
    }
}

/// Plain-text error with the status reason as a prefix.
pub fn web_error(status: StatusCode, message: &str) -> Response {
    let reason = status.canonical_reason().unwrap_or("error");
    let body = if message.is_empty() {
        format!("{reason}\n")
    } else {
        format!("{reason}: {message}\n")
    };
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

pub fn not_found() -> Response {
    web_error(StatusCode::NOT_FOUND, "")
}

/// Recovery boundary for `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");
    web_error(StatusCode::INTERNAL_SERVER_ERROR, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let res = redirect("https://bafy.ipfs.dweb.link/?a=b");
        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            res.headers()[header::LOCATION],
            "https://bafy.ipfs.dweb.link/?a=b"
        );
    }

    #[test]
    fn test_redirect_rejects_control_characters() {
        let res = redirect("/ipfs/bafy\n");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_panic_is_generic_500() {
        let res = handle_panic(Box::new("secret detail"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
