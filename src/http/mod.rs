//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, gateway headers)
//!     → middleware/hostname.rs (hostname decision: 301 / 404 / 400 / rewrite)
//!     → server.rs proxy_handler (forward to upstream gateway)
//!     → response.rs (plain-text errors, redirects)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{X_GATEWAY_HOSTNAME, X_GATEWAY_HOSTNAME_KIND, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
