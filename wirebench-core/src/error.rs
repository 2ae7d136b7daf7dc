//! Custom error types for wirebench.
//!
//! Explicit enum error types only. Library code never returns
//! `anyhow::Result`; binaries box these at the top level.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for configuration and startup.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum WireError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors abort the process before any request is made.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown mode: {value} (expected rest or grpc)")]
    UnknownMode { value: String },

    #[error("Invalid address: {field} = {value} - {reason}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Logical errors returned by the todo service.
///
/// Transports map these onto client-error responses; anything else they
/// see is an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("invalid input")]
    InvalidInput,

    #[error("todo not found")]
    NotFound,
}

/// Result type alias using WireError.
pub type WireResult<T> = Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_validation_error_display() {
        let err = HardValidationError::InvalidFieldValue {
            field: "concurrency",
            value: "0".to_string(),
            reason: "must be > 0".to_string(),
        };
        assert!(err.to_string().contains("concurrency"));
        assert!(err.to_string().contains("must be > 0"));
    }

    #[test]
    fn test_error_chain() {
        let validation_err = HardValidationError::UnknownMode {
            value: "soap".to_string(),
        };
        let wire_err: WireError = validation_err.into();
        assert!(matches!(wire_err, WireError::HardValidation(_)));
    }
}
