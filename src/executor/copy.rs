//! Metadata-preserving file copy

use crate::types::OrganizeError;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Buffer size for streaming file content
const COPY_BUFFER_SIZE: usize = 128 * 1024;

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fresh temporary sibling used while `dest` is being written
///
/// The name is short and independent of `dest`'s own name, so a destination
/// name near the filesystem's length limit still gets a valid part file.
pub fn part_path_for(dest: &Path) -> PathBuf {
    let n = PART_COUNTER.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!(".sortcopy-{}-{}.part", std::process::id(), n))
}

/// Copy `src` to `dest`, keeping content, permissions and mtime.
///
/// 1. Stream `src` into a hidden `.sortcopy-<pid>-<n>.part` sibling of `dest`
/// 2. Flush and sync to disk
/// 3. Copy permissions and modification time from `src`
/// 4. Rename onto `dest`
///
/// `src` is only ever read. On any failure the part file is removed and
/// `dest` is left untouched. `dest` is expected to be a free slot; an
/// existing file there would be replaced by the rename.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(OrganizeError)` - classified IO failure
///
/// # Example
/// ```no_run
/// use sortcopy::executor::copy_file_preserving;
/// use std::path::Path;
///
/// let bytes = copy_file_preserving(Path::new("photo.jpg"), Path::new("Image/photo.jpg"))?;
/// # Ok::<(), sortcopy::types::OrganizeError>(())
/// ```
pub fn copy_file_preserving(src: &Path, dest: &Path) -> Result<u64, OrganizeError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| OrganizeError::from_io(parent, e))?;
    }

    let part_path = part_path_for(dest);
    let result = write_part_then_commit(src, dest, &part_path);

    if result.is_err() {
        // best effort; report the copy error
        let _ = fs::remove_file(&part_path);
    }
    result
}

fn write_part_then_commit(src: &Path, dest: &Path, part_path: &Path) -> Result<u64, OrganizeError> {
    let mut src_file = File::open(src).map_err(|e| OrganizeError::from_io(src, e))?;
    let mut part_file = File::create(part_path).map_err(|e| OrganizeError::from_io(dest, e))?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| OrganizeError::from_io(src, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        part_file
            .write_all(&buffer[0..bytes_read])
            .map_err(|e| OrganizeError::from_io(dest, e))?;
        total_bytes += bytes_read as u64;
    }

    part_file
        .sync_all()
        .map_err(|e| OrganizeError::from_io(dest, e))?;

    // Drop the handle before rename (required on Windows)
    drop(part_file);
    drop(src_file);

    let src_metadata = fs::metadata(src).map_err(|e| OrganizeError::from_io(src, e))?;

    let mtime = src_metadata
        .modified()
        .map_err(|e| OrganizeError::from_io(src, e))?;
    filetime::set_file_mtime(part_path, filetime::FileTime::from_system_time(mtime))
        .map_err(|e| OrganizeError::from_io(dest, e))?;

    // Permissions last: a read-only source must not stop the mtime update above
    fs::set_permissions(part_path, src_metadata.permissions())
        .map_err(|e| OrganizeError::from_io(dest, e))?;

    fs::rename(part_path, dest).map_err(|e| OrganizeError::from_io(dest, e))?;

    Ok(total_bytes)
}
