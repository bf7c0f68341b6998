//! Executor module for file operations on the target tree

pub mod copy;
pub mod layout;

pub use copy::copy_file_preserving;
pub use layout::{category_dir, create_category_dirs};
