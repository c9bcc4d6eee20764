//! Error types for rate sources and the oracle.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("{source_name}: request failed: {reason}")]
    Transport { source_name: String, reason: String },

    /// The endpoint answered with a non-success status.
    #[error("{source_name}: HTTP {status}")]
    Status { source_name: String, status: u16 },

    /// The body was not JSON, or the configured path did not lead to a number.
    #[error("{source_name}: malformed response: {reason}")]
    Decode { source_name: String, reason: String },

    /// The source returned a rate that cannot be used for conversion.
    #[error("{source_name}: unusable rate {value}")]
    InvalidRate { source_name: String, value: f64 },

    #[error("invalid oracle configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, OracleError>;
