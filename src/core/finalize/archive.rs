//! Archiving of superseded outputs
//!
//! Archive names carry a UTC timestamp plus a monotonically increasing
//! counter suffix, giving a total order over archived versions. History is
//! never overwritten: the destination name is probed until a free slot is
//! found.

use crate::domain::errors::FhmlError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One archived version of a superseded file
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveEntry {
    /// Where the file lived before archiving
    pub original_path: PathBuf,

    /// Where the archived version lives now
    pub archived_path: PathBuf,

    /// When the archiving happened
    pub timestamp: DateTime<Utc>,
}

/// Resolves a collision-free archive destination for `file_name`.
pub fn archive_destination(archive_dir: &Path, file_name: &str, now: DateTime<Utc>) -> PathBuf {
    let stamp = now.format("%Y%m%dT%H%M%SZ");
    let base = archive_dir.join(format!("{file_name}.{stamp}"));
    if !base.exists() {
        return base;
    }
    let mut counter = 1u32;
    loop {
        let candidate = archive_dir.join(format!("{file_name}.{stamp}-{counter:03}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves `path` into the archive directory when it exists.
///
/// Returns the archive entry, or `None` when there was nothing to archive.
pub fn archive_file(archive_dir: &Path, path: &Path) -> Result<Option<ArchiveEntry>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::create_dir_all(archive_dir)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FhmlError::Archive(format!("invalid file name: {}", path.display())))?;

    let now = Utc::now();
    let destination = archive_destination(archive_dir, file_name, now);

    fs::rename(path, &destination).map_err(|e| {
        FhmlError::Archive(format!(
            "cannot archive {} to {}: {e}",
            path.display(),
            destination.display()
        ))
    })?;

    tracing::info!(
        from = %path.display(),
        to = %destination.display(),
        "Superseded file archived"
    );

    Ok(Some(ArchiveEntry {
        original_path: path.to_path_buf(),
        archived_path: destination,
        timestamp: now,
    }))
}
