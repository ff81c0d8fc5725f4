//! Response envelope interpretation.
//!
//! Both backends wrap their payloads in the same envelope:
//!
//! ```text
//! { "success": true,  "cached": false, "data": ... }
//! { "success": false, "error": "Human readable reason" }
//! ```
//!
//! The functions here are pure: they take the HTTP status and raw body and
//! decide between a typed payload and an [`ApiError`]. Callers apply the
//! outcome to their own state.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Fallback text when the server reports failure without a reason.
pub const GENERIC_FAILURE: &str = "The request could not be completed.";

/// Successfully interpreted response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<T> {
    /// Decoded `data` field.
    pub data: T,
    /// Whether the backend served this from its own cache.
    pub cached: bool,
}

impl<T> Payload<T> {
    /// Transform the data while keeping the cache flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Payload<U> {
        Payload {
            data: f(self.data),
            cached: self.cached,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    success: Option<bool>,
    #[serde(default)]
    cached: bool,
    error: Option<Value>,
    message: Option<Value>,
    data: Option<Value>,
}

impl RawEnvelope {
    /// Server-supplied reason, preferring `error` over `message`.
    fn reason(&self) -> Option<String> {
        [&self.error, &self.message]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
    }
}

/// Interpret a response whose `data` field is required.
///
/// # Errors
///
/// - [`ApiError::HttpStatus`] for non-2xx statuses
/// - [`ApiError::Application`] when the body reports `success: false`
/// - [`ApiError::MalformedResponse`] when the body is not JSON, lacks
///   `success`, or carries `data` of the wrong shape
pub fn interpret<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<Payload<T>> {
    let envelope = open(status, body)?;
    let cached = envelope.cached;
    let Some(data) = envelope.data else {
        return Err(ApiError::MalformedResponse(
            "response is missing the data field".to_string(),
        ));
    };
    let data = serde_json::from_value(data)
        .map_err(|e| ApiError::MalformedResponse(format!("unexpected data shape: {e}")))?;
    Ok(Payload { data, cached })
}

/// Interpret a response where `data` is optional (acknowledgement-style calls).
///
/// # Errors
///
/// Same as [`interpret`], except a missing `data` field is accepted.
pub fn interpret_ack(status: u16, body: &[u8]) -> Result<Payload<Option<Value>>> {
    let envelope = open(status, body)?;
    Ok(Payload {
        data: envelope.data.filter(|v| !v.is_null()),
        cached: envelope.cached,
    })
}

/// Error for a non-2xx response, using the server's reason when the body
/// carries one.
pub(crate) fn http_failure(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<RawEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.reason())
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    ApiError::HttpStatus { status, message }
}

/// Shared status and `success` handling.
fn open(status: u16, body: &[u8]) -> Result<RawEnvelope> {
    if !(200..300).contains(&status) {
        return Err(http_failure(status, body));
    }

    let envelope: RawEnvelope = serde_json::from_slice(body)
        .map_err(|e| ApiError::MalformedResponse(format!("body is not valid JSON: {e}")))?;

    match envelope.success {
        Some(true) => Ok(envelope),
        Some(false) => Err(ApiError::Application(
            envelope
                .reason()
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        )),
        None => Err(ApiError::MalformedResponse(
            "response is missing the success flag".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_with_cache_flag() {
        let body = br#"{"success": true, "cached": true, "data": []}"#;
        let payload: Payload<Vec<String>> = interpret(200, body).unwrap();
        assert_eq!(payload.data, Vec::<String>::new());
        assert!(payload.cached);
    }

    #[test]
    fn test_cached_defaults_to_false() {
        let body = br#"{"success": true, "data": ["a"]}"#;
        let payload: Payload<Vec<String>> = interpret(200, body).unwrap();
        assert!(!payload.cached);
    }

    #[test]
    fn test_application_failure_uses_error_field() {
        let body = br#"{"success": false, "error": "X"}"#;
        let err = interpret::<Vec<String>>(200, body).unwrap_err();
        assert_eq!(err, ApiError::Application("X".to_string()));
    }

    #[test]
    fn test_application_failure_without_reason() {
        let body = br#"{"success": false}"#;
        let err = interpret::<Vec<String>>(200, body).unwrap_err();
        assert_eq!(err, ApiError::Application(GENERIC_FAILURE.to_string()));
    }

    #[test]
    fn test_http_failure_with_unparsable_body() {
        let err = interpret::<Vec<String>>(500, b"<html>Bad Gateway</html>").unwrap_err();
        match err {
            ApiError::HttpStatus { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_http_failure_uses_server_message() {
        let body = br#"{"success": false, "error": "Card not found"}"#;
        let err = interpret::<Vec<String>>(404, body).unwrap_err();
        assert_eq!(
            err,
            ApiError::HttpStatus {
                status: 404,
                message: "Card not found".to_string()
            }
        );
    }

    #[test]
    fn test_unparsable_success_body() {
        let err = interpret::<Vec<String>>(200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_wrong_data_shape() {
        let body = br#"{"success": true, "data": {"unexpected": 1}}"#;
        let err = interpret::<Vec<String>>(200, body).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_data_rejected_but_ack_accepts() {
        let body = br#"{"success": true}"#;
        assert!(matches!(
            interpret::<Vec<String>>(200, body),
            Err(ApiError::MalformedResponse(_))
        ));
        let ack = interpret_ack(200, body).unwrap();
        assert!(ack.data.is_none());
    }
}
