//! FileRecord and SkippedFile - per-file facts collected during a run

use super::{Category, OrganizeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A regular file found under the source root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path of the source file
    pub path: PathBuf,

    /// Category resolved from the extension
    pub category: Category,

    /// File size in bytes, as seen by the scanner
    pub size: u64,
}

impl FileRecord {
    /// Create a record, classifying the path on the way in
    pub fn new(path: PathBuf, size: u64) -> Self {
        let category = Category::classify(&path);
        Self {
            path,
            category,
            size,
        }
    }

    /// Final path component, lossily converted for display
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Why a source file did not produce a new copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkipReason {
    /// The literal destination slot already holds identical content
    Duplicate { existing: PathBuf },

    /// Copy (or a step before it) failed
    Failed { kind: String, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Duplicate { existing } => {
                write!(f, "duplicate of {}", existing.display())
            }
            SkipReason::Failed { message, .. } => write!(f, "failed: {}", message),
        }
    }
}

/// A source file that was not copied, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub source: PathBuf,
    pub reason: SkipReason,
}

impl SkippedFile {
    pub fn duplicate(source: PathBuf, existing: PathBuf) -> Self {
        Self {
            source,
            reason: SkipReason::Duplicate { existing },
        }
    }

    pub fn failed(source: PathBuf, error: &OrganizeError) -> Self {
        Self {
            source,
            reason: SkipReason::Failed {
                kind: error.kind_label().to_string(),
                message: error.to_string(),
            },
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.reason, SkipReason::Duplicate { .. })
    }
}

/// File name of `path` for log lines and progress labels.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
