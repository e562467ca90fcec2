//! Error types for `hudconfig`
//!
//! This module defines all error types used throughout the library,
//! providing clear error messages and proper error propagation.
//!
//! Store failures are split by phase: a store that cannot be parsed at load
//! time is fatal (`StoreError::Corrupt`), while a failed write is recoverable
//! and surfaces from the manager as `HudConfigError::PersistFailed`.

use std::path::PathBuf;
use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Errors raised by a [`ConfigStore`](crate::config::ConfigStore) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store exists but its contents cannot be parsed as a widget configuration
    #[error("Configuration store {} is corrupt: {source}", path.display())]
    Corrupt {
        /// Location of the unreadable store
        path: PathBuf,
        /// Parser error describing the first problem found
        #[source]
        source: serde_json::Error,
    },

    /// The store exists but could not be read
    #[error("Failed to read configuration store {}: {source}", path.display())]
    Read {
        /// Location of the store
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the new store contents failed; the previous contents are intact
    #[error("Failed to write configuration store {}: {source}", path.display())]
    Write {
        /// Location of the store
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The in-memory configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Whether this error means the persisted bytes are unusable and the user
    /// should be offered a reset to defaults
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Errors raised while delivering a reload signal to the renderer
///
/// These never fail a manager operation; they are logged and dropped.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Socket or file system failure while broadcasting
    #[error("Reload broadcast failed: {0}")]
    Io(#[from] std::io::Error),

    /// The transport is not available on this platform
    #[error("Reload transport not supported on this platform")]
    Unsupported,
}

/// Main error type for `hudconfig`
#[derive(Debug, Error)]
pub enum HudConfigError {
    /// The widget store could not be loaded
    #[error("Failed to load widget configuration: {0}")]
    LoadFailed(#[source] StoreError),

    /// The widget store could not be written; in-memory state was rolled back
    #[error("Failed to persist widget configuration: {0}")]
    PersistFailed(#[source] StoreError),

    /// Reload signal could not be sent
    #[error("Failed to signal HUD reload: {0}")]
    Notify(#[from] NotifyError),

    /// Logging subsystem could not be initialized
    /// Preserves the underlying error source for full error chain transparency
    #[error("Logging setup failed: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl HudConfigError {
    /// Whether the error was caused by an unparseable store
    pub fn is_corrupt_store(&self) -> bool {
        matches!(self, Self::LoadFailed(e) if e.is_corrupt())
    }
}

/// Result type alias for `hudconfig` operations
pub type Result<T> = std::result::Result<T, HudConfigError>;

/// Convert an error to a user-friendly message
///
/// Corrupt stores point the user at a reset, write failures at a retry.
pub fn get_user_friendly_error(error: &HudConfigError) -> String {
    match error {
        HudConfigError::LoadFailed(StoreError::Corrupt { path, .. }) => {
            format!(
                "Your widget configuration could not be read:\n\n{}\n\n\
                 The file is damaged. Reset to defaults to continue \
                 (all widget sets will be removed).",
                path.display()
            )
        }
        HudConfigError::LoadFailed(e) => {
            format!(
                "Failed to load widget configuration:\n\n{e}\n\n\
                 Please check file permissions."
            )
        }
        HudConfigError::PersistFailed(e) => {
            format!(
                "Your changes could not be saved:\n\n{e}\n\n\
                 The previous configuration is still in place.\n\
                 Check disk space and permissions, then retry or discard the edit."
            )
        }
        HudConfigError::Notify(_) => "The HUD could not be told to reload.\n\n\
             Your changes were saved and will apply the next time the HUD reloads."
            .to_string(),
        HudConfigError::LoggingError(_) => "Failed to initialize logging.\n\n\
             The application will continue without a log file."
            .to_string(),
        HudConfigError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        HudConfigError::JsonError(e) => {
            format!("Configuration data could not be encoded:\n\n{e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrupt_error() -> StoreError {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        StoreError::Corrupt {
            path: PathBuf::from("/tmp/widgets.json"),
            source,
        }
    }

    #[test]
    fn test_corrupt_store_is_flagged() {
        let error = HudConfigError::LoadFailed(corrupt_error());
        assert!(error.is_corrupt_store());

        let error = HudConfigError::LoadFailed(StoreError::Read {
            path: PathBuf::from("/tmp/widgets.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(!error.is_corrupt_store());
    }

    #[test]
    fn test_persist_failed_display() {
        let error = HudConfigError::PersistFailed(StoreError::Write {
            path: PathBuf::from("/tmp/widgets.json"),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(
            error.to_string(),
            "Failed to persist widget configuration: \
             Failed to write configuration store /tmp/widgets.json: disk full"
        );
    }

    #[test]
    fn test_user_friendly_corrupt_offers_reset() {
        let error = HudConfigError::LoadFailed(corrupt_error());
        let message = get_user_friendly_error(&error);
        assert!(message.contains("Reset to defaults"));
        assert!(message.contains("widgets.json"));
    }

    #[test]
    fn test_user_friendly_persist_mentions_retry() {
        let error = HudConfigError::PersistFailed(StoreError::Write {
            path: PathBuf::from("/tmp/widgets.json"),
            source: std::io::Error::other("disk full"),
        });
        let message = get_user_friendly_error(&error);
        assert!(message.contains("retry or discard"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: HudConfigError = io_error.into();
        assert!(matches!(error, HudConfigError::IoError(_)));
    }

    #[test]
    fn test_notify_error_from_io() {
        let error: NotifyError = std::io::Error::other("boom").into();
        let error: HudConfigError = error.into();
        assert!(matches!(error, HudConfigError::Notify(NotifyError::Io(_))));
    }
}
