//! Progress updates delivered to the caller during a run

use serde::Serialize;
use std::fmt;

/// Label of the final update after the last file
pub const LABEL_COMPLETED: &str = "completed";

/// Label of the final update after a stop request
pub const LABEL_CANCELLED: &str = "cancelled";

/// Prefix of every label emitted while scanning
pub const SCAN_LABEL_PREFIX: &str = "Scanning: ";

/// Pipeline phase an update belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Scanning,
    Processing,
    Completed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Cancelled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Scanning => "scanning",
            Phase::Processing => "processing",
            Phase::Completed => LABEL_COMPLETED,
            Phase::Cancelled => LABEL_CANCELLED,
        };
        f.write_str(name)
    }
}

/// One `(current, total, label)` step of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub phase: Phase,
    pub label: String,
}

impl ProgressUpdate {
    pub fn new(phase: Phase, current: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            phase,
            label: label.into(),
        }
    }

    /// Final update: `current == total`, label names the terminal state
    pub fn terminal(phase: Phase, total: usize) -> Self {
        Self::new(phase, total, total, phase.to_string())
    }
}

/// Callback for progress updates
///
/// Invoked synchronously on the thread running the pipeline; it must return
/// promptly.
pub type ProgressCallback = Box<dyn Fn(&ProgressUpdate) + Send + Sync>;
