//! Per-stem report directory layout
//!
//! Every validated file owns a directory tree under the reports base,
//! keyed by its canonical stem:
//!
//! ```text
//! reports/<stem>/json/      structured reports
//! reports/<stem>/txt/       human-readable digests
//! reports/<stem>/ret/       comparator outputs (written externally)
//! reports/<stem>/corrigido/ corrected and finalized artifacts
//! reports/<stem>/archive/   superseded versions
//! ```

use crate::domain::result::Result;
use crate::domain::stem::Stem;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved artifact locations for one stem
#[derive(Debug, Clone)]
pub struct ReportLayout {
    stem_dir: PathBuf,
    stem: Stem,
}

impl ReportLayout {
    /// Creates the layout for a stem under the reports base directory.
    pub fn new(reports_dir: impl AsRef<Path>, stem: &Stem) -> Self {
        Self {
            stem_dir: reports_dir.as_ref().join(stem.as_str()),
            stem: stem.clone(),
        }
    }

    /// The stem this layout is keyed by.
    pub fn stem(&self) -> &Stem {
        &self.stem
    }

    /// Directory for structured JSON reports.
    pub fn json_dir(&self) -> PathBuf {
        self.stem_dir.join("json")
    }

    /// Directory for human-readable digests.
    pub fn txt_dir(&self) -> PathBuf {
        self.stem_dir.join("txt")
    }

    /// Directory for comparator outputs (populated externally).
    pub fn ret_dir(&self) -> PathBuf {
        self.stem_dir.join("ret")
    }

    /// Directory for corrected sub-batches and the canonical final file.
    pub fn corrected_dir(&self) -> PathBuf {
        self.stem_dir.join("corrigido")
    }

    /// Directory for superseded versions.
    pub fn archive_dir(&self) -> PathBuf {
        self.stem_dir.join("archive")
    }

    /// Creates the full directory tree.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            self.json_dir(),
            self.txt_dir(),
            self.ret_dir(),
            self.corrected_dir(),
            self.archive_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
