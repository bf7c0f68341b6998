//! Target tree layout: one directory per category

use crate::types::{Category, OrganizeError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under `target_root` that receives files of `category`
pub fn category_dir(target_root: &Path, category: Category) -> PathBuf {
    target_root.join(category.name())
}

/// Create every category directory under `target_root`, in table order.
///
/// Idempotent: directories that already exist are fine. Returns the
/// directories in table order.
pub fn create_category_dirs(target_root: &Path) -> Result<Vec<PathBuf>, OrganizeError> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let dir = category_dir(target_root, category);
            fs::create_dir_all(&dir).map_err(|e| OrganizeError::from_io(&dir, e))?;
            Ok(dir)
        })
        .collect()
}
