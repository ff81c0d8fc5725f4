//! Client settings - persisted user preferences.
//!
//! Settings are read from a TOML file in the platform config directory. A
//! missing or unreadable file yields defaults; command-line flags are
//! applied on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tcm_api::ApiSettings;
use tcm_query::QuerySettings;

/// Client settings.
///
/// Serialized to TOML and stored in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend URLs, timeout and user agent.
    pub api: ApiSettings,

    /// Debounce and minimum length per query channel.
    pub query: QuerySettings,
}

impl Settings {
    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring invalid settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = self.to_toml()?;

        std::fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize settings: {}", e))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(
        mut self,
        search_url: Option<String>,
        auth_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(url) = search_url {
            self.api.search_base_url = url;
        }
        if let Some(url) = auth_url {
            self.api.auth_base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.api.timeout_secs = secs;
        }
        self
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Directory for durable client state (the registration snapshot).
    pub fn data_dir() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".tcm"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "CardMarket", "tcm")
}
