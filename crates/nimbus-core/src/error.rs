//! Error types for Nimbus API operations.
//!
//! A single error enum covers the whole client surface: URI construction,
//! configuration, transport failures, response decoding and non-success
//! API statuses.

use thiserror::Error;

/// Main error type for Nimbus client operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A URI or base URL could not be parsed
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Client configuration was rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level failure (connect, TLS, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The ambient deadline expired before the call completed
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The response body did not match the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The server answered with a non-success status.
    ///
    /// The message is the raw response body, verbatim; error payload shapes
    /// vary between API versions so no structured schema is assumed.
    #[error("{body}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// An identifier string was not a valid UUID
    #[error("Invalid resource id: {0}")]
    InvalidId(String),
}

/// Specialized result type for Nimbus operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status carried by this error, when the server produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for a 404 from the server.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUri(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidId(err.to_string())
    }
}
