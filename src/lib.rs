//! # sortcopy - Sort Files Into Category Folders
//!
//! Copies every file under a source tree into `Image/`, `Video/`, `Audio/`,
//! `Document/`, `Archive/`, `Program/` or `Other/` under a target tree,
//! chosen by extension. Sources are never modified; identical files are
//! skipped and name clashes get a `_N` suffix.

// Module declarations
pub mod commands;
pub mod config;
pub mod dedupe;
pub mod engine;
pub mod executor;
pub mod hash;
pub mod report;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use engine::{Organizer, ProgressUpdate, StopHandle};
pub use report::RunReport;
pub use types::{Category, OrganizeError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
