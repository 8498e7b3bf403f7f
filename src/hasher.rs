//! Content hashing for change detection.

use crate::error::ReconcileError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compute the SHA-256 digest of a file's contents as lowercase hex.
///
/// Streams the file through the hasher in fixed-size chunks so large
/// artifacts never have to fit in memory.
pub fn sha256_file(path: &Path) -> Result<String, ReconcileError> {
    let mut file = File::open(path).map_err(|source| ReconcileError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|source| ReconcileError::UnreadableFile {
                path: path.to_path_buf(),
                source,
            })?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
