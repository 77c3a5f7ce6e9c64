//! Centralized error handling for markedit
//!
//! This module provides a unified error type that covers all error scenarios
//! in the editing core: construction, backup persistence, and host-reported
//! image resolution failures.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the editing core.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the editing core.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Construction Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// No text surface was supplied to the builder. The core cannot
    /// operate without one, so this is fatal at construction.
    NoSurface,

    // ─────────────────────────────────────────────────────────────────────────
    // Backup Persistence Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to load a backup record
    BackupLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save a backup record
    BackupSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse a persisted record or options blob (invalid JSON)
    Parse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Backup directory not found or inaccessible
    BackupDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Host-Reported Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The host's image-paste resolver reported a failure
    ImageResolve(String),

    /// Generic application error with a message
    Application(String),
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Construction Errors
            Error::NoSurface => {
                write!(f, "No text surface configured for the editor core")
            }

            // Backup Persistence Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::BackupLoad { path, source } => {
                write!(f, "Failed to load backup from '{}': {}", path.display(), source)
            }
            Error::BackupSave { path, source } => {
                write!(f, "Failed to save backup to '{}': {}", path.display(), source)
            }
            Error::Parse { message, .. } => {
                write!(f, "Invalid record format: {}", message)
            }
            Error::BackupDirNotFound => {
                write!(f, "Backup directory not found")
            }

            // Host-Reported Errors
            Error::ImageResolve(msg) => write!(f, "Image resolution failed: {}", msg),
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::BackupLoad { source, .. } => Some(source.as_ref()),
            Error::BackupSave { source, .. } => Some(source.as_ref()),
            Error::Parse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::NoSurface
            | Error::BackupDirNotFound
            | Error::ImageResolve(_)
            | Error::Application(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_backup_save_error() {
        let path = PathBuf::from("/test/backup.json");
        let io_err = io::Error::new(io::ErrorKind::Other, "write failed");
        let err = Error::BackupSave {
            path: path.clone(),
            source: Box::new(io_err),
        };
        assert!(matches!(err, Error::BackupSave { path: p, .. } if p == path));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_display_no_surface() {
        let err = Error::NoSurface;
        let msg = format!("{}", err);
        assert!(msg.contains("text surface"));
    }

    #[test]
    fn test_display_image_resolve() {
        let err = Error::ImageResolve("upload timed out".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("upload timed out"));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error as StdError;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err = Error::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_simple_variants() {
        use std::error::Error as StdError;
        let err = Error::Application("test".to_string());
        assert!(err.source().is_none());

        let err = Error::NoSurface;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        use super::ResultExt;
        let result: super::Result<i32> = Ok(42);
        let value = result.unwrap_or_warn_default(0, "test context");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        use super::ResultExt;
        let result: super::Result<i32> = Err(Error::Application("test".to_string()));
        let value = result.unwrap_or_warn_default(0, "test context");
        assert_eq!(value, 0);
    }
}
