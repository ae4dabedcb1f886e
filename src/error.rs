//! Error types for the contact dispatch core.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use std::fmt;
use thiserror::Error;

/// Classification of a transport failure.
///
/// Only `Authentication` is terminal for the retry loop; every other kind
/// is retried until the attempt budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Backend rejected the credentials (`extensions.code == "UNAUTHENTICATED"`)
    Authentication,

    /// Backend returned an application-level error payload
    Graphql,

    /// Backend answered with a non-2xx status
    Http,

    /// Request never completed (connection, DNS, timeout)
    Network,
}

impl TransportErrorKind {
    /// Whether the retry loop may try again after this kind of failure.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Authentication)
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Graphql => "GRAPHQL",
            Self::Http => "HTTP",
            Self::Network => "NETWORK",
        };
        f.write_str(label)
    }
}

/// Errors that can occur when talking to the backend contact endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    /// What class of failure this is
    pub kind: TransportErrorKind,

    /// Human-readable message, suitable for display
    pub message: String,

    /// HTTP status, when the backend answered at all
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Authentication, message)
    }

    pub fn graphql(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Graphql, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(TransportErrorKind::Http, message)
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::graphql(format!("Invalid response body: {}", err))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Failed to load .env file
    #[error("Failed to load .env file: {0}")]
    DotenvError(String),
}

/// Convenience type alias for Results with TransportError
pub type TransportResult<T> = Result<T, TransportError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
