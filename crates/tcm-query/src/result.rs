//! Visible state of a query channel.

use tcm_api::{ApiError, Payload};

/// What a view bound to a query channel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult<T> {
    /// Nothing requested (or the input was cleared).
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Success {
        /// Decoded payload.
        data: T,
        /// Whether the backend answered from its cache.
        cached: bool,
    },
    /// The latest request failed; the message is ready for display.
    Failure(String),
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> QueryResult<T> {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Successful data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the shown data came from the backend cache.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Success { cached: true, .. })
    }
}

impl<T> From<Result<Payload<T>, ApiError>> for QueryResult<T> {
    fn from(outcome: Result<Payload<T>, ApiError>) -> Self {
        match outcome {
            Ok(payload) => Self::Success {
                data: payload.data,
                cached: payload.cached,
            },
            Err(err) => Self::Failure(err.user_message()),
        }
    }
}
