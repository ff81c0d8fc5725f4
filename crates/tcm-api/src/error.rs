//! Error types for the marketplace API clients.

use thiserror::Error;

/// Errors that can occur while talking to the search or account backends.
///
/// Cancelling a superseded request is not an error and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured client timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or one synthesized from the status.
        message: String,
    },

    /// The server answered 2xx but reported `success: false`.
    #[error("{0}")]
    Application(String),

    /// The body could not be interpreted as the expected envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built (bad base URL, bad path segment).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Returns a message suitable for a banner in the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the server. Please check your internet connection.".to_string()
            }
            Self::Timeout => "The server took too long to respond. Please try again.".to_string(),
            Self::HttpStatus { message, .. } | Self::Application(message) => message.clone(),
            Self::MalformedResponse(_) => {
                "The server sent a response that could not be read.".to_string()
            }
            Self::InvalidRequest(_) => "An unexpected error occurred.".to_string(),
        }
    }

    /// Returns whether offering the user a retry makes sense.
    ///
    /// Nothing is retried automatically.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::Application(_) | Self::MalformedResponse(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// HTTP status attached to this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
