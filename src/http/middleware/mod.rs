//! Request middleware.

pub mod hostname;

pub use hostname::hostname_middleware;
