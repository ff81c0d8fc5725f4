//! Snapshot persistence errors.

use std::path::PathBuf;

use thiserror::Error;

/// Snapshot store operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} snapshot file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot written by an incompatible version.
    #[error("Snapshot version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Serialization error.
    #[error("Failed to serialize wizard snapshot")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization error.
    #[error("Failed to deserialize wizard snapshot")]
    Deserialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete snapshot save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be used as a file name.
    #[error("Invalid snapshot key: {0:?}")]
    InvalidKey(String),
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!(
                "Could not {} the saved registration at {}",
                operation,
                path.display()
            ),
            Self::UnsupportedVersion { .. } => {
                "The saved registration comes from a different version and was ignored.".to_string()
            }
            Self::Serialization { .. } => {
                "An error occurred while saving your registration progress.".to_string()
            }
            Self::Deserialization { .. } => {
                "The saved registration could not be read and was ignored.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save registration progress to {}. Please check disk space and permissions.",
                target_path.display()
            ),
            Self::InvalidKey(key) => format!("'{key}' is not a valid storage key."),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
