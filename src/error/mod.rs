//! Error handling module for endpoint health tracking

use std::fmt;
use thiserror::Error;

use crate::models::Category;

/// Boxed cause carried by a [`NetworkError`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classified failure kinds shared across the network layer.
///
/// Only `ConnectionFailed`, `Unknown` and `ConfigurationMissing` are raised by
/// the health core; the remaining kinds belong to the wider wallet/transaction
/// layer and share the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Network/RPC
    ConnectionFailed,
    RpcError,
    Timeout,
    InvalidResponse,

    // Transactions
    TransactionBuildFailed,
    TransactionSignFailed,
    TransactionBroadcastFailed,
    MempoolConflict,
    TxNotFound,

    // Assets
    AssetInfoNotFound,
    InvalidAddress,

    // Wallet/funds
    InsufficientFunds,
    InsufficientFeeFunds,

    // Other
    ConfidentialTxError,
    ConfigurationMissing,
    Unknown,
}

impl ErrorKind {
    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::ConnectionFailed => "Could not reach the endpoint. A new check will run shortly.",
            ErrorKind::Timeout => "The endpoint took too long to answer.",
            ErrorKind::ConfigurationMissing => "Configure at least one endpoint of this category.",
            ErrorKind::InvalidResponse | ErrorKind::RpcError => "The endpoint returned an unexpected response.",
            ErrorKind::InsufficientFunds | ErrorKind::InsufficientFeeFunds => "Insufficient funds.",
            _ => "An unexpected error occurred.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A classified network error: kind, message, optional details and cause
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct NetworkError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

impl NetworkError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Transport failure while reaching `url`
    pub fn connection_failed<E>(url: &str, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(ErrorKind::ConnectionFailed, format!("Network error checking {}", url))
            .with_details(cause.to_string())
            .with_source(cause)
    }

    /// Unclassified failure while checking `url`
    pub fn unknown<E>(url: &str, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(ErrorKind::Unknown, format!("Unexpected error checking {}", url))
            .with_details(cause.to_string())
            .with_source(cause)
    }

    /// No endpoint is configured for `category`
    pub fn configuration_missing(category: Category) -> Self {
        Self::new(
            ErrorKind::ConfigurationMissing,
            format!(
                "No {} found. Please configure at least one {} URL in settings.",
                category.label(),
                category.label()
            ),
        )
        .with_details(category.to_string())
    }

    pub fn is_connection_failure(&self) -> bool {
        self.kind == ErrorKind::ConnectionFailed
    }

    /// End-user text; a missing configuration names its category
    pub fn user_message(&self) -> String {
        match (self.kind, self.details.as_deref()) {
            (ErrorKind::ConfigurationMissing, Some(category)) => {
                format!("Configure at least one {} endpoint.", category)
            }
            _ => self.kind.user_message().to_string(),
        }
    }
}

/// Crate-level error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// The classified network error, if this is one
    pub fn as_network(&self) -> Option<&NetworkError> {
        match self {
            Error::Network(e) => Some(e),
            _ => None,
        }
    }

    /// True for transport-level failures that warrant a recovery check
    pub fn is_transport_failure(&self) -> bool {
        match self {
            Error::Network(e) => e.is_connection_failure(),
            Error::Http(e) => is_transport_error(e),
            _ => false,
        }
    }
}

/// Result type for endpoint health operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Unknown(err.to_string())
    }
}

/// DNS, connect and timeout failures from reqwest
pub fn is_transport_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_names_category() {
        let err = NetworkError::configuration_missing(Category::Relay);
        assert_eq!(err.kind, ErrorKind::ConfigurationMissing);
        assert!(err.message.contains("relay"));
        assert_eq!(err.details.as_deref(), Some("relay"));
        assert_eq!(err.user_message(), "Configure at least one relay endpoint.");
    }

    #[test]
    fn test_user_message_falls_back_to_kind() {
        let err = NetworkError::new(ErrorKind::ConnectionFailed, "down").with_details("ignored");
        assert_eq!(err.user_message(), ErrorKind::ConnectionFailed.user_message());
    }

    #[test]
    fn test_connection_failed_wraps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = NetworkError::connection_failed("http://bad.invalid", cause);
        assert!(err.is_connection_failure());
        assert!(err.message.contains("http://bad.invalid"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_transport_failure_classification() {
        let conn: Error = NetworkError::new(ErrorKind::ConnectionFailed, "down").into();
        let other: Error = NetworkError::new(ErrorKind::InvalidResponse, "bad body").into();
        assert!(conn.is_transport_failure());
        assert!(!other.is_transport_failure());
        assert!(!Error::Config("x".into()).is_transport_failure());
    }
}
