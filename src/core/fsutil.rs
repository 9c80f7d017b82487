//! Shared filesystem discipline for pipeline outputs
//!
//! Every write to a directory shared with concurrent readers (reports,
//! corrected batches, archive, outbound) goes through write-to-temp-then-
//! rename so no partial file is ever observable. The temporary file is
//! created inside the destination directory to keep the final rename on a
//! single filesystem, where it is atomic.

use crate::domain::errors::FhmlError;
use crate::domain::result::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process;

/// Writes `bytes` to `path` atomically.
///
/// Parent directories are created as needed. The temporary name embeds the
/// process id so concurrent pipeline invocations for different stems never
/// collide on the scratch file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        FhmlError::Io(format!("destination has no parent directory: {}", path.display()))
    })?;
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FhmlError::Io(format!("invalid destination name: {}", path.display())))?;
    let tmp_path = dir.join(format!(".{file_name}.{}.tmp", process::id()));

    let mut tmp = fs::File::create(&tmp_path)?;
    tmp.write_all(bytes)?;
    tmp.sync_all()?;
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path) {
        // Leave no scratch file behind on a failed publish
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// SHA-256 checksum of raw bytes, hex-encoded.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}
