//! Duplicate detection and collision-free destination naming

use crate::engine::MessageSink;
use crate::hash::{compute_hash, Digest};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// True if anything (file, directory, even a dangling symlink) sits at `path`.
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Decide whether `destination` already holds exactly the bytes of `source`.
///
/// Fast path: a missing destination is never a duplicate and nothing is
/// hashed. Otherwise both files are hashed in full and compared.
///
/// A hashing failure on either side is logged to `sink` and counts as
/// "not a duplicate", so an unreadable file is copied (and fails loudly
/// there) rather than silently dropped.
pub fn is_duplicate(source: &Path, destination: &Path, sink: &dyn MessageSink) -> bool {
    if !is_occupied(destination) {
        return false;
    }

    let source_hash = match hash_or_log(source, sink) {
        Some(hash) => hash,
        None => return false,
    };
    let destination_hash = match hash_or_log(destination, sink) {
        Some(hash) => hash,
        None => return false,
    };

    source_hash == destination_hash
}

fn hash_or_log(path: &Path, sink: &dyn MessageSink) -> Option<Digest> {
    match compute_hash(path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            sink.warn(&format!("Failed to hash {}: {}", path.display(), e));
            None
        }
    }
}

/// Pick a path in `directory` for `file_name` that nothing occupies yet.
///
/// The literal name wins if free. After that `stem_1.ext`, `stem_2.ext`, ...
/// are tried in order and the first free slot is returned, so the result
/// is deterministic for a given directory state. Only the last extension
/// is kept apart: `a.tar.gz` becomes `a.tar_1.gz`, `.bashrc` becomes
/// `.bashrc_1`.
///
/// Races with any other writer in `directory`; callers are expected to be
/// the only one placing files there.
pub fn unique_destination(directory: &Path, file_name: &Path) -> PathBuf {
    let candidate = directory.join(file_name);
    if !is_occupied(&candidate) {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| file_name.as_os_str().to_os_string());
    let extension = file_name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut name = OsString::with_capacity(stem.len() + 8);
        name.push(&stem);
        name.push(format!("_{}", counter));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = directory.join(&name);
        if !is_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
