//! The organize pipeline: prepare, scan, process, report

use super::progress::{Phase, ProgressCallback, ProgressUpdate, SCAN_LABEL_PREFIX};
use super::sink::{MessageSink, TracingSink};
use super::state::{EngineState, RunState};
use super::stop::StopHandle;
use crate::dedupe::{is_duplicate, unique_destination};
use crate::executor::{category_dir, copy_file_preserving, create_category_dirs};
use crate::report::{RunOutcome, RunReport};
use crate::scanner::{scan_directory, ScanOptions};
use crate::types::{display_name, FileRecord, OrganizeError, SkippedFile};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What happened to a single file
#[derive(Debug)]
enum FileOutcome {
    Copied { destination: PathBuf, bytes: u64 },
    Duplicate { existing: PathBuf },
}

/// Copies every file under a source tree into per-category folders of a
/// target tree.
///
/// One instance drives exactly one run. Source files are only read.
///
/// # Example
/// ```no_run
/// use sortcopy::engine::Organizer;
///
/// let mut organizer = Organizer::new("/home/me/Downloads", "/home/me/Sorted");
/// let report = organizer.run()?;
/// println!("{}", report.render());
/// # Ok::<(), sortcopy::types::OrganizeError>(())
/// ```
pub struct Organizer {
    source: PathBuf,
    target: PathBuf,
    scan_options: ScanOptions,
    progress: Option<ProgressCallback>,
    sink: Arc<dyn MessageSink>,
    stop: StopHandle,
    state: EngineState,
}

impl Organizer {
    /// Create an engine for `source` → `target`. Touches nothing on disk.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            scan_options: ScanOptions::default(),
            progress: None,
            sink: Arc::new(TracingSink),
            stop: StopHandle::new(),
            state: EngineState::Idle,
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Handle that can stop this engine's run from another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Same as `stop_handle().request_stop()`
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run the whole pipeline on the calling thread.
    ///
    /// Per-file failures end up in [`RunReport::skipped`]. `Err` is returned
    /// only when the engine was already used, an exclude pattern is invalid,
    /// or the source root cannot be listed.
    pub fn run(&mut self) -> Result<RunReport, OrganizeError> {
        if self.state != EngineState::Idle {
            return Err(OrganizeError::EngineReused {
                state: self.state.to_string(),
            });
        }

        let started_at = Utc::now();
        // Stop requests count from here on; earlier ones were dropped
        self.stop.arm();

        self.state = EngineState::Preparing;
        self.sink.info(&format!("Source: {}", self.source.display()));
        self.sink.info(&format!("Target: {}", self.target.display()));
        self.prepare_target();

        self.state = EngineState::Scanning;
        let scan = match self.scan() {
            Ok(scan) => scan,
            Err(e) => {
                self.sink.error(&e.to_string());
                self.state = EngineState::Failed;
                return Err(e);
            }
        };
        self.sink.info(&format!("Found {} files", scan.len()));

        if scan.is_empty() {
            self.sink.warn("No files found to organize");
            self.emit(ProgressUpdate::terminal(Phase::Completed, 0));
            self.state = EngineState::Completed;
            return Ok(RunReport::empty(
                self.source.clone(),
                self.target.clone(),
                started_at,
            ));
        }

        self.state = EngineState::Processing;
        let total = scan.len();
        let mut run_state = RunState::new(total, started_at);
        let mut cancelled = false;

        for (index, record) in scan.iter().enumerate() {
            if self.stop.is_stop_requested() {
                self.sink.warn(&format!(
                    "Stop requested, halting before {}",
                    record.path.display()
                ));
                cancelled = true;
                break;
            }

            self.emit(ProgressUpdate::new(
                Phase::Processing,
                index + 1,
                total,
                record.file_name(),
            ));

            match self.process_file(record) {
                Ok(FileOutcome::Copied { destination, bytes }) => {
                    self.sink.info(&format!(
                        "Copied: {} -> {}/{}",
                        record.file_name(),
                        record.category,
                        display_name(&destination)
                    ));
                    run_state.record_copy(destination, record.category, bytes);
                }
                Ok(FileOutcome::Duplicate { existing }) => {
                    self.sink
                        .info(&format!("Skipping duplicate: {}", record.file_name()));
                    run_state.record_skip(SkippedFile::duplicate(record.path.clone(), existing));
                }
                Err(e) => {
                    self.sink.error(&format!(
                        "Failed to process {}: {}",
                        record.path.display(),
                        e
                    ));
                    run_state.record_skip(SkippedFile::failed(record.path.clone(), &e));
                }
            }
        }

        let (phase, outcome, state) = if cancelled {
            (Phase::Cancelled, RunOutcome::Cancelled, EngineState::Cancelled)
        } else {
            (Phase::Completed, RunOutcome::Completed, EngineState::Completed)
        };

        self.emit(ProgressUpdate::terminal(phase, total));
        self.state = state;

        let report = run_state.into_report(outcome, self.source.clone(), self.target.clone());
        self.sink.info(&report.render());
        Ok(report)
    }

    /// Create the category directories. Failure here is logged, not fatal:
    /// each file's copy will then fail and be recorded on its own.
    fn prepare_target(&self) {
        match create_category_dirs(&self.target) {
            Ok(dirs) => {
                for dir in dirs {
                    self.sink.debug(&format!("Created directory: {}", dir.display()));
                }
            }
            Err(e) => self
                .sink
                .error(&format!("Failed to prepare target directories: {}", e)),
        }
    }

    fn scan(&self) -> Result<Vec<FileRecord>, OrganizeError> {
        self.sink
            .info(&format!("Scanning directory: {}", self.source.display()));

        let on_entry: &dyn Fn(usize, usize, &Path) = &|current, total, path| {
            self.emit(ProgressUpdate::new(
                Phase::Scanning,
                current,
                total,
                format!("{}{}", SCAN_LABEL_PREFIX, display_name(path)),
            ));
        };

        let result = scan_directory(
            &self.source,
            &self.scan_options,
            Some(self.target.as_path()),
            Some(on_entry),
            self.sink.as_ref(),
        )?;
        Ok(result.files)
    }

    /// classify → duplicate check on the literal slot → unique name → copy
    fn process_file(&self, record: &FileRecord) -> Result<FileOutcome, OrganizeError> {
        let file_name = record.path.file_name().ok_or_else(|| {
            OrganizeError::Validation(format!("No file name in {}", record.path.display()))
        })?;
        let directory = category_dir(&self.target, record.category);

        // Only the un-renamed slot is compared; earlier `_n` copies are not consulted.
        let literal = directory.join(file_name);
        if is_duplicate(&record.path, &literal, self.sink.as_ref()) {
            return Ok(FileOutcome::Duplicate { existing: literal });
        }

        let destination = unique_destination(&directory, Path::new(file_name));
        let bytes = copy_file_preserving(&record.path, &destination)?;

        Ok(FileOutcome::Copied { destination, bytes })
    }

    fn emit(&self, update: ProgressUpdate) {
        if let Some(callback) = &self.progress {
            callback(&update);
        }
    }
}
