//! Directory scanning logic

mod walker;

pub use walker::{scan_directory, ScanOptions, ScanProgress, ScanResult, IGNORE_FILE_NAME};
