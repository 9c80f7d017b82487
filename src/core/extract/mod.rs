//! Candidate file extraction
//!
//! Input files arrive either as flat `.d` record files or as `.zip`
//! containers holding exactly one candidate record file. This module
//! normalizes both into an in-memory byte payload; nothing is written to
//! disk.

use crate::domain::errors::FhmlError;
use crate::domain::result::Result;
use crate::domain::stem::Stem;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// ZIP local-file-header magic.
const ZIP_MAGIC: [u8; 4] = [b'P', b'K', 0x03, 0x04];

/// Outcome of an extraction step
#[derive(Debug)]
pub struct Extraction {
    /// Raw payload bytes of the candidate record file
    pub bytes: Vec<u8>,

    /// Path of the original input file
    pub source_path: PathBuf,

    /// Base identifier derived from the candidate file name
    pub stem: Stem,

    /// Whether the payload was extracted from a zip container
    pub extracted_from_zip: bool,
}

/// Reads the candidate record payload from `path`.
///
/// A zip container must hold exactly one member matching the candidate
/// naming convention (`*.d`, case-insensitive); a flat file is read as-is.
///
/// # Errors
///
/// Returns `FhmlError::Archive` when the container is corrupt or does not
/// hold exactly one candidate member, and `FhmlError::Io` when the input
/// cannot be read.
pub fn extract_candidate(path: &Path) -> Result<Extraction> {
    let raw = fs::read(path)
        .map_err(|e| FhmlError::Io(format!("cannot read input {}: {e}", path.display())))?;

    if raw.starts_with(&ZIP_MAGIC) {
        tracing::info!(path = %path.display(), "Extracting zip container");
        return extract_zip(path, raw);
    }

    let stem = Stem::from_path(path).map_err(FhmlError::Format)?;
    Ok(Extraction {
        bytes: raw,
        source_path: path.to_path_buf(),
        stem,
        extracted_from_zip: false,
    })
}

fn extract_zip(path: &Path, raw: Vec<u8>) -> Result<Extraction> {
    let mut archive = ZipArchive::new(Cursor::new(raw))
        .map_err(|e| FhmlError::Archive(format!("invalid zip {}: {e}", path.display())))?;

    let candidates: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/') && is_candidate_name(name))
        .map(str::to_string)
        .collect();

    let member_name = match candidates.as_slice() {
        [single] => single.clone(),
        [] => {
            return Err(FhmlError::Archive(format!(
                "no candidate .d member found in {}",
                path.display()
            )))
        }
        many => {
            return Err(FhmlError::Archive(format!(
                "expected exactly one candidate .d member in {}, found {}",
                path.display(),
                many.len()
            )))
        }
    };

    let mut bytes = Vec::new();
    archive
        .by_name(&member_name)
        .map_err(|e| FhmlError::Archive(format!("cannot open member {member_name}: {e}")))?
        .read_to_end(&mut bytes)
        .map_err(|e| FhmlError::Archive(format!("cannot extract member {member_name}: {e}")))?;

    // Stem comes from the member, not the container, so reports key on the
    // record file identity
    let member_file = Path::new(&member_name)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&member_name));
    let stem = Stem::from_path(&member_file).map_err(FhmlError::Format)?;

    tracing::debug!(member = %member_name, size = bytes.len(), "Extracted candidate member");

    Ok(Extraction {
        bytes,
        source_path: path.to_path_buf(),
        stem,
        extracted_from_zip: true,
    })
}

fn is_candidate_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("d"))
}
