//! Configuration management

use crate::scanner::ScanOptions;
use crate::types::OrganizeError;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Sort files into category folders by extension (copy only)
#[derive(Debug, Parser)]
#[command(name = "sortcopy", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy every file under SOURCE into DEST/<Category>/
    Organize(OrganizeArgs),

    /// Check that SOURCE and DEST are usable without copying anything
    Check(PathArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PathArgs {
    /// Directory to scan (never modified)
    pub source: PathBuf,

    /// Directory that receives the category folders
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct OrganizeArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Leave out paths matching this glob (repeatable)
    #[arg(short, long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Honor .gitignore, .ignore and .sortignore files in SOURCE
    #[arg(long)]
    pub respect_ignore_files: bool,

    /// Write a JSON run report to FILE
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Read defaults from a TOML file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More output (-v per-file lines, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// No progress bars
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Settings accepted from a `--config` TOML file
///
/// ```toml
/// exclude = ["*.tmp", "node_modules/"]
/// respect_ignore_files = true
/// report = "last-run.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub exclude: Vec<String>,
    pub respect_ignore_files: bool,
    pub report: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, OrganizeError> {
        let text = fs::read_to_string(path).map_err(|e| {
            OrganizeError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
            .map_err(|e| OrganizeError::Config(format!("{} ({})", e, path.display())))
    }

    pub fn parse(text: &str) -> Result<Self, OrganizeError> {
        toml::from_str(text).map_err(|e| OrganizeError::Config(format!("Invalid config: {}", e)))
    }
}

/// Resolved configuration for one organize run
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// What the scanner includes
    pub scan: ScanOptions,

    /// Where to write the JSON report, if anywhere
    pub report_path: Option<PathBuf>,

    /// Verbosity (0 = warnings, 1 = per-file lines, 2 = debug)
    pub verbose: u8,

    /// Hide progress bars
    pub quiet: bool,
}

impl Config {
    /// Create a config for `source` → `destination` with defaults elsewhere
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Default::default()
        }
    }

    /// Layer a config file under the CLI values.
    ///
    /// Flags win; exclude lists are concatenated (file first).
    pub fn merge_file(&mut self, file: FileConfig) {
        let mut exclude = file.exclude;
        exclude.append(&mut self.scan.exclude_patterns);
        self.scan.exclude_patterns = exclude;
        self.scan.respect_ignore_files |= file.respect_ignore_files;
        if self.report_path.is_none() {
            self.report_path = file.report;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), OrganizeError> {
        validate_paths(&self.source, &self.destination)
    }
}

/// Checks shared by `organize` and `check`.
pub fn validate_paths(source: &Path, destination: &Path) -> Result<(), OrganizeError> {
    if !source.exists() {
        return Err(OrganizeError::Config(format!(
            "Source path does not exist: {}",
            source.display()
        )));
    }

    if !source.is_dir() {
        return Err(OrganizeError::Config(format!(
            "Source path is not a directory: {}",
            source.display()
        )));
    }

    if destination.exists() && !destination.is_dir() {
        return Err(OrganizeError::Config(format!(
            "Destination exists and is not a directory: {}",
            destination.display()
        )));
    }

    if same_location(source, destination) {
        return Err(OrganizeError::Config(
            "Source and destination cannot be the same".to_string(),
        ));
    }

    Ok(())
}

fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl TryFrom<OrganizeArgs> for Config {
    type Error = OrganizeError;

    fn try_from(args: OrganizeArgs) -> Result<Self, Self::Error> {
        let mut config = Config {
            source: args.paths.source,
            destination: args.paths.destination,
            scan: ScanOptions {
                exclude_patterns: args.exclude,
                respect_ignore_files: args.respect_ignore_files,
            },
            report_path: args.report,
            verbose: args.verbose,
            quiet: args.quiet,
        };

        if let Some(path) = &args.config {
            config.merge_file(FileConfig::load(path)?);
        }

        config.validate()?;
        Ok(config)
    }
}
