//! Run statistics and the human-readable summary

use crate::types::{Category, OrganizeError, SkippedFile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const RULE_WIDTH: usize = 50;

/// Format a byte count with binary scaling and two decimals.
///
/// Divides by 1024 until the value drops below 1024 or the units run out,
/// so anything past TB stays in TB.
///
/// ```
/// use sortcopy::report::format_size;
///
/// assert_eq!(format_size(0), "0.00 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1_073_741_824), "1.00 GB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Files processed per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    counts: BTreeMap<Category, usize>,
}

impl CategoryStats {
    /// Every category present, all at zero
    pub fn new() -> Self {
        Self {
            counts: Category::ALL.into_iter().map(|c| (c, 0)).collect(),
        }
    }

    pub fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Categories with at least one file, in table order
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(category, count)| (*category, *count))
    }
}

impl Default for CategoryStats {
    fn default() -> Self {
        Self::new()
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Cancelled,
}

/// Everything a finished (or stopped) run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub source: PathBuf,
    pub target: PathBuf,
    pub categories: CategoryStats,

    /// Destination paths written, in processing order
    pub processed: Vec<PathBuf>,

    /// Source files that produced no copy
    pub skipped: Vec<SkippedFile>,

    /// Files found by the scan
    pub total_files: usize,

    /// Bytes written to the target
    pub total_bytes: u64,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Report for a run that found nothing to do
    pub fn empty(source: PathBuf, target: PathBuf, started_at: DateTime<Utc>) -> Self {
        Self {
            outcome: RunOutcome::Completed,
            source,
            target,
            categories: CategoryStats::new(),
            processed: Vec::new(),
            skipped: Vec::new(),
            total_files: 0,
            total_bytes: 0,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.outcome == RunOutcome::Cancelled
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn duplicate_count(&self) -> usize {
        self.skipped.iter().filter(|s| s.is_duplicate()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.skipped_count() - self.duplicate_count()
    }

    /// Files neither copied nor skipped because the run stopped early
    pub fn untouched_count(&self) -> usize {
        self.total_files
            .saturating_sub(self.processed_count() + self.skipped_count())
    }

    /// Human-readable summary.
    ///
    /// Categories with no files are left out.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let headline = match self.outcome {
            RunOutcome::Completed => "Organizing complete!",
            RunOutcome::Cancelled => "Organizing stopped by request",
        };
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", headline);
        let _ = writeln!(out, "{}", rule);

        let mut categories = self.categories.non_empty().peekable();
        if categories.peek().is_some() {
            let _ = writeln!(out, "\nBy category:");
            for (category, count) in categories {
                let _ = writeln!(out, "  {}: {} {}", category, count, plural(count));
            }
        }

        let _ = writeln!(out, "\nTotals:");
        let _ = writeln!(
            out,
            "  Processed: {} {}",
            self.processed_count(),
            plural(self.processed_count())
        );
        let _ = writeln!(
            out,
            "  Skipped: {} {} ({} duplicate, {} failed)",
            self.skipped_count(),
            plural(self.skipped_count()),
            self.duplicate_count(),
            self.failed_count()
        );
        if self.is_cancelled() {
            let _ = writeln!(out, "  Not reached: {}", self.untouched_count());
        }
        let _ = writeln!(out, "  Total size: {}", format_size(self.total_bytes));

        let _ = write!(out, "\nTarget directory: {}", self.target.display());
        out
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String, OrganizeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| OrganizeError::Validation(format!("Failed to serialize report: {}", e)))
    }

    /// Write the JSON report to `path`, creating parent directories
    pub fn write_json(&self, path: &Path) -> Result<(), OrganizeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::from_io(parent, e))?;
        }
        fs::write(path, self.to_json()?).map_err(|e| OrganizeError::from_io(path, e))
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "file"
    } else {
        "files"
    }
}
