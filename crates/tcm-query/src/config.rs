//! Timing configuration for query channels.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Debounce settings for one query channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Quiet period, in milliseconds, before the latest input is committed.
    pub debounce_ms: u64,

    /// Terms shorter than this (in characters, after trimming) clear the
    /// channel instead of scheduling a request.
    pub min_length: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_length: 2,
        }
    }
}

impl QueryConfig {
    /// Suggestions while typing in the search bar.
    #[must_use]
    pub const fn autocomplete() -> Self {
        Self {
            debounce_ms: 150,
            min_length: 2,
        }
    }

    /// Full result pages.
    #[must_use]
    pub const fn search() -> Self {
        Self {
            debounce_ms: 300,
            min_length: 2,
        }
    }

    /// Email availability while filling in the registration form.
    #[must_use]
    pub const fn email_check() -> Self {
        Self {
            debounce_ms: 500,
            min_length: 3,
        }
    }

    /// Whether `term` is long enough to query, after trimming.
    #[must_use]
    pub fn accepts(&self, term: &str) -> bool {
        term.trim().chars().count() >= self.min_length.max(1)
    }

    /// Quiet period as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Per-channel settings, as stored in the `[query]` settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub autocomplete: QueryConfig,
    pub search: QueryConfig,
    pub email_check: QueryConfig,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            autocomplete: QueryConfig::autocomplete(),
            search: QueryConfig::search(),
            email_check: QueryConfig::email_check(),
        }
    }
}
