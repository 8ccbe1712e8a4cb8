//! Error types module
//!
//! `UploadError` is the single failure type of the upload and delete
//! operations. Every variant renders a human-readable message, which is what
//! the upload state container stores for presentation layers.

use std::fmt;

use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like rejected requests
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how a failure should be reported.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "VALIDATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// The two logical operations a state container tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Upload,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Upload => f.write_str("upload"),
            OperationKind::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    #[error("{}", rejection_message(.status, .detail))]
    ServerRejected { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("Another {0} is already in progress")]
    Busy(OperationKind),
}

fn rejection_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.trim().is_empty() => detail.to_string(),
        _ => format!("Request failed with status {}", status),
    }
}

impl UploadError {
    pub fn server_rejected(status: u16, detail: Option<String>) -> Self {
        UploadError::ServerRejected { status, detail }
    }

    /// Get error type name for logging
    pub fn error_type_name(&self) -> &'static str {
        match self {
            UploadError::ValidationFailed(_) => "ValidationFailed",
            UploadError::Unauthenticated(_) => "Unauthenticated",
            UploadError::ServerRejected { .. } => "ServerRejected",
            UploadError::NetworkFailure(_) => "NetworkFailure",
            UploadError::MalformedResponse(_) => "MalformedResponse",
            UploadError::Busy(_) => "Busy",
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        match self {
            UploadError::ValidationFailed(ValidationError::TooLarge { .. }) => "FILE_TOO_LARGE",
            UploadError::ValidationFailed(ValidationError::UnsupportedType { .. }) => {
                "UNSUPPORTED_TYPE"
            }
            UploadError::ValidationFailed(ValidationError::UnsupportedExtension { .. }) => {
                "UNSUPPORTED_EXTENSION"
            }
            UploadError::Unauthenticated(_) => "UNAUTHENTICATED",
            UploadError::ServerRejected { .. } => "SERVER_REJECTED",
            UploadError::NetworkFailure(_) => "NETWORK_FAILURE",
            UploadError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            UploadError::Busy(_) => "BUSY",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploadError::ValidationFailed(_) | UploadError::MalformedResponse(_) => false,
            UploadError::Unauthenticated(_) => false,
            UploadError::ServerRejected { status, .. } => *status >= 500,
            UploadError::NetworkFailure(_) | UploadError::Busy(_) => true,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploadError::ValidationFailed(_) | UploadError::Busy(_) => LogLevel::Debug,
            UploadError::Unauthenticated(_) => LogLevel::Debug,
            UploadError::ServerRejected { status, .. } if *status >= 500 => LogLevel::Error,
            UploadError::ServerRejected { .. } => LogLevel::Warn,
            UploadError::NetworkFailure(_) => LogLevel::Warn,
            UploadError::MalformedResponse(_) => LogLevel::Error,
        }
    }
}
