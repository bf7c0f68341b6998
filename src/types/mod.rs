//! Core type definitions for sortcopy

mod category;
mod error;
mod record;

pub use category::Category;
pub use error::OrganizeError;
pub(crate) use record::display_name;
pub use record::{FileRecord, SkipReason, SkippedFile};
