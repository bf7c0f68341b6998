//! Sequential directory walker

use crate::engine::MessageSink;
use crate::types::{display_name, FileRecord, OrganizeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// Name of the per-directory ignore file honored with `respect_ignore_files`
pub const IGNORE_FILE_NAME: &str = ".sortignore";

/// Callback for reporting scan progress
///
/// Arguments:
/// - `current`: 1-based index of the entry being looked at
/// - `total`: number of entries the walk produced
/// - `path`: the entry itself
pub type ScanProgress<'a> = &'a dyn Fn(usize, usize, &Path);

/// What to include while walking the source tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Globs (gitignore syntax) for paths to leave out
    pub exclude_patterns: Vec<String>,

    /// Honor `.gitignore`, `.ignore` and `.sortignore` files
    pub respect_ignore_files: bool,
}

/// Result of walking a source tree
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Regular files, in walk order
    pub files: Vec<FileRecord>,

    /// Entries (files, dirs, links) the walk produced below the root
    pub entries_seen: usize,

    /// Entries that could not be listed or stat'd
    pub errors: usize,

    pub total_bytes: u64,
    pub duration: Duration,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Walk `root_path` and collect every regular file below it.
///
/// The walk runs to completion first so `total` is known, then each entry
/// is reported through `on_progress` while files are picked out. Order is
/// whatever the filesystem hands back.
///
/// `skip_dir`, when given, is pruned from the walk (the target root when it
/// sits inside the source).
///
/// # Errors
/// * `SourceUnreadable` if the root itself cannot be listed
/// * `InvalidPattern` if an exclude glob does not parse
///
/// Everything below the root is best effort: unreadable directories, vanished
/// files and broken symlinks are reported to `sink` and skipped.
pub fn scan_directory(
    root_path: &Path,
    options: &ScanOptions,
    skip_dir: Option<&Path>,
    on_progress: Option<ScanProgress<'_>>,
    sink: &dyn MessageSink,
) -> Result<ScanResult, OrganizeError> {
    let start_time = Instant::now();

    fs::read_dir(root_path).map_err(|e| OrganizeError::SourceUnreadable {
        path: root_path.to_path_buf(),
        source: e,
    })?;
    let root = std::path::absolute(root_path).map_err(|e| OrganizeError::SourceUnreadable {
        path: root_path.to_path_buf(),
        source: e,
    })?;

    let overrides = build_overrides(&root, &options.exclude_patterns)?;
    let skip_dir = skip_dir.and_then(|dir| fs::canonicalize(dir).ok());

    let respect = options.respect_ignore_files;
    let mut builder = ignore::WalkBuilder::new(&root);
    builder
        .hidden(false)
        .parents(respect)
        .git_ignore(respect)
        .git_global(respect)
        .git_exclude(respect)
        .ignore(respect)
        .follow_links(false)
        .overrides(overrides);
    if respect {
        builder.add_custom_ignore_filename(IGNORE_FILE_NAME);
    }
    if let Some(skip) = skip_dir {
        builder.filter_entry(move |entry| !is_same_dir(entry, &skip));
    }

    let mut result = ScanResult::default();
    let mut entries = Vec::new();

    for item in builder.build() {
        match item {
            Ok(entry) => {
                if entry.depth() > 0 {
                    entries.push(entry);
                }
            }
            Err(e) => {
                result.errors += 1;
                sink.warn(&format!(
                    "Error during directory traversal: {}. Scan will continue with remaining entries.",
                    e
                ));
            }
        }
    }

    let total = entries.len();
    result.entries_seen = total;

    for (index, entry) in entries.iter().enumerate() {
        let path = entry.path();
        if let Some(callback) = on_progress {
            callback(index + 1, total, path);
        }

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };

        if file_type.is_dir() {
            continue;
        }

        // Special files (pipes, sockets, devices) are not organized
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }

        // fs::metadata follows symlinks: a link counts only if it ends at a regular file
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                result.errors += 1;
                if file_type.is_symlink() {
                    sink.warn(&format!(
                        "Skipping broken symlink {}: {}",
                        path.display(),
                        e
                    ));
                } else {
                    sink.warn(&format!(
                        "Failed to read metadata for {}: {}. File will be skipped.",
                        path.display(),
                        e
                    ));
                }
                continue;
            }
        };

        if !metadata.is_file() {
            continue;
        }

        result.total_bytes += metadata.len();
        result.files.push(FileRecord::new(path.to_path_buf(), metadata.len()));
    }

    result.duration = start_time.elapsed();
    sink.debug(&format!(
        "Scanned {} entries under {} in {:?}",
        total,
        display_name(&root),
        result.duration
    ));

    Ok(result)
}

fn build_overrides(root: &Path, patterns: &[String]) -> Result<ignore::overrides::Override, OrganizeError> {
    let mut builder = ignore::overrides::OverrideBuilder::new(root);

    for pattern in patterns {
        // `!` turns an override glob into an ignore rule
        builder
            .add(&format!("!{}", pattern))
            .map_err(|e| OrganizeError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
    }

    builder.build().map_err(|e| OrganizeError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

fn is_same_dir(entry: &ignore::DirEntry, skip: &Path) -> bool {
    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
    is_dir
        && fs::canonicalize(entry.path())
            .map(|p| p == skip)
            .unwrap_or(false)
}
