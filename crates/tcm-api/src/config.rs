//! Connection settings for the marketplace backends.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default search backend.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:8080";

/// Default account backend.
pub const DEFAULT_AUTH_URL: &str = "http://localhost:8000";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings shared by the search and account clients.
///
/// Every request carries the timeout; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the card search API.
    pub search_base_url: String,

    /// Base URL of the authentication/account API.
    pub auth_base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Optional user agent override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ApiSettings {
    /// Request timeout as a [`Duration`]. Zero is bumped to one second.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// User agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| concat!("tcm/", env!("CARGO_PKG_VERSION")).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ApiSettings::default();
        assert_eq!(settings.search_base_url, DEFAULT_SEARCH_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(15));
        assert!(settings.user_agent().starts_with("tcm/"));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let settings = ApiSettings {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(settings.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ApiSettings =
            serde_json::from_str(r#"{"search_base_url": "https://search.example"}"#).unwrap();
        assert_eq!(settings.search_base_url, "https://search.example");
        assert_eq!(settings.auth_base_url, DEFAULT_AUTH_URL);
    }
}
