//! Subcommand entry points used by the binary

pub mod check;
pub mod organize;
