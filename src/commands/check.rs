//! Pre-flight check: can SOURCE be read and DEST be written?

use crate::config::validate_paths;
use crate::types::OrganizeError;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one check line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckItem {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }

    fn render(&self) -> String {
        let mark = if self.passed {
            style("✓").green()
        } else {
            style("✗").red()
        };
        format!("{} {}: {}", mark, self.name, self.detail)
    }
}

/// Run every check without copying anything or creating DEST.
pub fn inspect(source: &Path, destination: &Path) -> Vec<CheckItem> {
    let mut items = Vec::new();

    match validate_paths(source, destination) {
        Ok(()) => items.push(CheckItem::pass("paths", "source and destination are distinct")),
        Err(e) => {
            items.push(CheckItem::fail("paths", e.to_string()));
            return items;
        }
    }

    items.push(match fs::read_dir(source) {
        Ok(_) => CheckItem::pass("source", format!("{} is readable", source.display())),
        Err(e) => CheckItem::fail("source", OrganizeError::from_io(source, e).to_string()),
    });

    let absolute_destination =
        std::path::absolute(destination).unwrap_or_else(|_| destination.to_path_buf());
    items.push(match writable_ancestor(destination) {
        Some(dir) => match probe_write(&dir) {
            Ok(()) if dir == absolute_destination => CheckItem::pass(
                "destination",
                format!("{} is writable", destination.display()),
            ),
            Ok(()) => CheckItem::pass(
                "destination",
                format!("{} can be created under {}", destination.display(), dir.display()),
            ),
            Err(e) => CheckItem::fail("destination", e.to_string()),
        },
        None => CheckItem::fail(
            "destination",
            format!("No existing parent directory for {}", destination.display()),
        ),
    });

    items
}

/// Print the check lines; `Err` if any failed.
pub fn run(source: &Path, destination: &Path) -> Result<(), OrganizeError> {
    let items = inspect(source, destination);
    for item in &items {
        println!("{}", item.render());
    }

    let failed = items.iter().filter(|item| !item.passed).count();
    tracing::debug!(checks = items.len(), failed, "environment check done");
    if failed > 0 {
        return Err(OrganizeError::Validation(format!(
            "{} check(s) failed",
            failed
        )));
    }
    println!("Ready to organize.");
    Ok(())
}

/// Nearest existing directory at or above `path`
fn writable_ancestor(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    absolute
        .ancestors()
        .find(|candidate| candidate.is_dir())
        .map(Path::to_path_buf)
}

fn probe_write(dir: &Path) -> Result<(), OrganizeError> {
    let probe = dir.join(format!(".sortcopy-probe-{}", std::process::id()));
    fs::write(&probe, b"").map_err(|e| OrganizeError::from_io(dir, e))?;
    fs::remove_file(&probe).map_err(|e| OrganizeError::from_io(&probe, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_all_checks_pass_for_fresh_destination() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let destination = out.path().join("sorted").join("nested");

        let items = inspect(src.path(), &destination);

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.passed), "{:?}", items);
        assert!(!destination.exists(), "check must not create the destination");
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0, "probe left behind");
    }

    #[test]
    fn test_existing_destination_is_probed_directly() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let items = inspect(src.path(), dst.path());

        assert!(items[2].passed);
        assert!(items[2].detail.contains("is writable"));
    }

    #[test]
    fn test_relative_existing_destination_is_writable() {
        let src = TempDir::new().unwrap();
        let cwd = std::env::current_dir().unwrap();
        let dst = TempDir::new_in(&cwd).unwrap();
        let relative = dst.path().strip_prefix(&cwd).unwrap();
        assert!(relative.is_relative());

        let items = inspect(src.path(), relative);

        assert!(items[2].passed, "{:?}", items);
        assert!(items[2].detail.contains("is writable"), "{}", items[2].detail);
    }

    #[test]
    fn test_missing_source_stops_early() {
        let dst = TempDir::new().unwrap();
        let items = inspect(&dst.path().join("missing"), dst.path());

        assert_eq!(items.len(), 1);
        assert!(!items[0].passed);
        assert!(run(&dst.path().join("missing"), dst.path()).is_err());
    }

    #[test]
    fn test_destination_that_is_a_file_fails() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let file = dst.path().join("taken");
        fs::write(&file, b"x").unwrap();

        let items = inspect(src.path(), &file);
        assert!(!items[0].passed);
        assert!(items[0].detail.contains("not a directory"));
    }
}
