//! Error types for sortcopy

use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for organize operations
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The source root itself could not be listed
    #[error("Cannot read source directory {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// An exclude glob did not parse
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Permission denied for specific path
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// No space left while writing a specific path
    #[error("Disk full while writing {path}")]
    DiskFull { path: PathBuf },

    /// `run` called on an engine that has already started a run
    #[error("Organizer already used (state: {state}); construct a new one for another run")]
    EngineReused { state: String },
}

impl OrganizeError {
    /// Classify a raw IO error raised while touching `path`.
    ///
    /// ENOSPC (28) and EDQUOT (122) map to `DiskFull` alongside `StorageFull`.
    pub fn from_io(path: &Path, error: IoError) -> Self {
        if matches!(error.kind(), ErrorKind::PermissionDenied) {
            OrganizeError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else if matches!(error.kind(), ErrorKind::StorageFull)
            || matches!(error.raw_os_error(), Some(28 | 122))
        {
            OrganizeError::DiskFull {
                path: path.to_path_buf(),
            }
        } else {
            OrganizeError::Io(error)
        }
    }

    /// Short label used to group failures in summaries
    pub fn kind_label(&self) -> &'static str {
        match self {
            OrganizeError::Io(_) => "I/O error",
            OrganizeError::Config(_) => "Configuration error",
            OrganizeError::Validation(_) => "Validation error",
            OrganizeError::SourceUnreadable { .. } => "Source unreadable",
            OrganizeError::InvalidPattern { .. } => "Invalid pattern",
            OrganizeError::PermissionDenied { .. } => "Permission denied",
            OrganizeError::DiskFull { .. } => "Disk full",
            OrganizeError::EngineReused { .. } => "Engine reused",
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            OrganizeError::Validation(_) | OrganizeError::Config(_) | OrganizeError::InvalidPattern { .. }
        )
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        matches!(self, OrganizeError::PermissionDenied { .. })
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        matches!(self, OrganizeError::DiskFull { .. })
    }

    /// Errors that end a whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OrganizeError::SourceUnreadable { .. }
                | OrganizeError::EngineReused { .. }
                | OrganizeError::InvalidPattern { .. }
        )
    }
}
