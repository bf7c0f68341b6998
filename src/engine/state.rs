//! Per-run mutable state and the engine lifecycle

use crate::report::{CategoryStats, RunOutcome, RunReport};
use crate::types::{Category, SkippedFile};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle of one [`Organizer`](super::Organizer).
///
/// `Idle → Preparing → Scanning → Processing → {Completed | Cancelled}`;
/// `Failed` is reached when the source root cannot be read. Only `Idle`
/// accepts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Preparing,
    Scanning,
    Processing,
    Completed,
    Cancelled,
    Failed,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EngineState::Completed | EngineState::Cancelled | EngineState::Failed
        )
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Counters and lists accumulated while processing
#[derive(Debug)]
pub(crate) struct RunState {
    pub processed: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub categories: CategoryStats,
    pub started_at: DateTime<Utc>,
}

impl RunState {
    pub fn new(total_files: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            processed: Vec::with_capacity(total_files),
            skipped: Vec::new(),
            total_files,
            total_bytes: 0,
            categories: CategoryStats::new(),
            started_at,
        }
    }

    pub fn record_copy(&mut self, destination: PathBuf, category: Category, bytes: u64) {
        self.processed.push(destination);
        self.categories.record(category);
        self.total_bytes += bytes;
    }

    pub fn record_skip(&mut self, skipped: SkippedFile) {
        self.skipped.push(skipped);
    }

    pub fn into_report(self, outcome: RunOutcome, source: PathBuf, target: PathBuf) -> RunReport {
        RunReport {
            outcome,
            source,
            target,
            categories: self.categories,
            processed: self.processed,
            skipped: self.skipped,
            total_files: self.total_files,
            total_bytes: self.total_bytes,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
