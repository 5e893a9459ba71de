//! Errors raised while canonicalizing hostnames.

use thiserror::Error;

/// DNS label length limit (RFC 1034 section 3.1).
pub const DNS_LABEL_MAX_LENGTH: usize = 63;

/// Errors that can occur while classifying or canonicalizing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Unparseable CID, base encoding, URL or protocol handler target.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Best-effort re-encoding still exceeds the DNS label limit.
    #[error("{kind} representation incompatible with DNS label length limit of 63: {label}")]
    LabelTooLong { kind: &'static str, label: String },

    /// Wildcard gateway hostname that cannot be compiled.
    #[error("invalid wildcard gateway hostname {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl GatewayError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        GatewayError::MalformedInput(msg.into())
    }

    pub fn is_label_too_long(&self) -> bool {
        matches!(self, GatewayError::LabelTooLong { .. })
    }
}

/// Result type for hostname operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
