//! Category - the fixed extension taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A destination bucket for organized files.
///
/// Declaration order is table order: it drives directory creation,
/// lookup precedence and the order categories appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Program,
    /// Fallback for anything the table does not list
    Other,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Category; 7] = [
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Document,
        Category::Archive,
        Category::Program,
        Category::Other,
    ];

    /// The designated fallback category.
    pub const FALLBACK: Category = Category::Other;

    /// Directory name used under the target root
    pub fn name(self) -> &'static str {
        match self {
            Category::Image => "Image",
            Category::Video => "Video",
            Category::Audio => "Audio",
            Category::Document => "Document",
            Category::Archive => "Archive",
            Category::Program => "Program",
            Category::Other => "Other",
        }
    }

    /// Lower-cased extensions (leading dot included) owned by this category.
    ///
    /// The fallback owns none.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Category::Image => &[
                ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".ico", ".tiff",
            ],
            Category::Video => &[
                ".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".webm", ".m4v", ".3gp",
            ],
            Category::Audio => &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".amr"],
            Category::Document => &[
                ".pdf", ".doc", ".docx", ".txt", ".rtf", ".xls", ".xlsx", ".ppt", ".pptx",
            ],
            Category::Archive => &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"],
            Category::Program => &[".exe", ".msi", ".dmg", ".pkg", ".deb", ".rpm", ".apk"],
            Category::Other => &[],
        }
    }

    /// Resolve the category for an extension such as `".JPG"` or `"jpg"`.
    ///
    /// Matching is case-insensitive and never fails: unknown or empty
    /// extensions resolve to [`Category::FALLBACK`].
    pub fn from_extension(ext: &str) -> Category {
        if ext.is_empty() {
            return Category::FALLBACK;
        }

        let normalized = if ext.starts_with('.') {
            ext.to_lowercase()
        } else {
            format!(".{}", ext.to_lowercase())
        };

        Category::ALL
            .into_iter()
            .filter(|category| *category != Category::FALLBACK)
            .find(|category| category.extensions().contains(&normalized.as_str()))
            .unwrap_or(Category::FALLBACK)
    }

    /// Classify a path by its final extension.
    ///
    /// `archive.tar.gz` is an Archive because `.gz` is; `Makefile` and
    /// `.bashrc` carry no extension and land in the fallback.
    pub fn classify(path: &Path) -> Category {
        match path.extension() {
            Some(ext) => Category::from_extension(&ext.to_string_lossy()),
            None => Category::FALLBACK,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
