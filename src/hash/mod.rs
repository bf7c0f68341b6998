//! Content hashing

use crate::types::OrganizeError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Size of each read when streaming a file through the hasher
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// A 32-byte Blake3 content digest
pub type Digest = [u8; 32];

/// Compute the Blake3 hash of a whole file
///
/// Streams the file in [`HASH_CHUNK_SIZE`] reads. Permission and
/// disk errors are classified through [`OrganizeError::from_io`].
///
/// # Example
/// ```no_run
/// use sortcopy::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), sortcopy::types::OrganizeError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<Digest, OrganizeError> {
    let mut file = File::open(file_path).map_err(|e| OrganizeError::from_io(file_path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut chunk = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&chunk[..n]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(OrganizeError::from_io(file_path, e)),
        }
    }

    Ok(*hasher.finalize().as_bytes())
}

/// Lower-case hex rendering of a digest, for log lines
pub fn to_hex(digest: &Digest) -> String {
    blake3::Hash::from(*digest).to_hex().to_string()
}
