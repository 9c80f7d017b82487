//! Finalization: merge, archive, atomic publish
//!
//! Merges the corrected sub-batches of a stem (or the validated original
//! when no correction was needed) into one canonical `<stem>_final.d`
//! with a trailer recomputed from the merged details, archives any
//! previously published version under a collision-free name, then writes
//! the canonical file and its outbound copy with the temp-then-rename
//! discipline so no concurrent reader ever observes a partial file.
//!
//! Finalize is idempotent in content, not in side effects: re-running on
//! unchanged input produces a byte-identical canonical file and one new
//! archive entry per run.

pub mod archive;

use crate::config::GateConfig;
use crate::core::diagnose::serialize_records;
use crate::core::extract::extract_candidate;
use crate::core::fsutil::{checksum_bytes, write_atomic};
use crate::core::pipeline;
use crate::core::report::layout::ReportLayout;
use crate::core::report::render;
use crate::core::sanitize::sanitize;
use crate::domain::errors::FhmlError;
use crate::domain::issue::Status;
use crate::domain::record::{RawRecord, RecordKind};
use crate::domain::report::FileReport;
use crate::domain::result::Result;
use crate::domain::stem::Stem;
use archive::{archive_file, ArchiveEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one finalize pass
#[derive(Debug)]
pub struct FinalizeOutcome {
    /// Canonical stem the outputs are keyed by
    pub stem: Stem,

    /// Location of the canonical file under `corrigido/`
    pub canonical_path: PathBuf,

    /// Location of the published outbound copy
    pub outbound_path: PathBuf,

    /// SHA-256 checksum of the canonical content
    pub checksum: String,

    /// Superseded versions archived during this pass
    pub archived: Vec<ArchiveEntry>,

    /// Report from re-validating the merged content
    pub report: FileReport,
}

/// Machine-readable summary written next to the canonical file
#[derive(Debug, Serialize)]
struct FinalSummary<'a> {
    stem: &'a str,
    status: Status,
    canonical_file: String,
    outbound_file: String,
    checksum_sha256: &'a str,
    archived: &'a [ArchiveEntry],
    finalized_at: DateTime<Utc>,
}

/// Finalizes the content described by a final-stage report.
///
/// # Errors
///
/// Returns `FhmlError::Format` when the merged content still fails
/// validation with ERROR status (finalize never publishes a file the
/// downstream system would reject), and `FhmlError::Archive`/`Io` when
/// archiving or publishing fails.
pub fn finalize(report: &FileReport, config: &GateConfig) -> Result<FinalizeOutcome> {
    let stem = Stem::new(report.stem.clone())
        .map_err(FhmlError::Format)?
        .canonical();
    let layout = ReportLayout::new(&config.directories.reports_dir, &stem);
    layout.ensure()?;

    // Prefer corrected sub-batches; fall back to the validated source
    let batch_paths = corrected_batches(&layout, &stem)?;
    let sources: Vec<Vec<RawRecord>> = if batch_paths.is_empty() {
        tracing::info!(stem = %stem, "No corrected batches, finalizing validated source");
        vec![read_records(Path::new(&report.source_path), config)?]
    } else {
        tracing::info!(stem = %stem, batches = batch_paths.len(), "Merging corrected batches");
        let mut sources = Vec::with_capacity(batch_paths.len());
        for path in &batch_paths {
            sources.push(read_records(path, config)?);
        }
        sources
    };

    let canonical_records = merge_records(sources);
    let bytes = serialize_records(&canonical_records);
    let checksum = checksum_bytes(&bytes);

    // The merged content must stand on its own before publishing
    let canonical_path = layout.corrected_dir().join(stem.final_file_name());
    let run = pipeline::validate_bytes(&bytes, &canonical_path, &stem, config)?;
    if run.report.status == Status::Error {
        let codes: Vec<_> = run.report.error_issues().map(|i| i.code.as_str()).collect();
        return Err(FhmlError::Format(format!(
            "merged content for {stem} still fails validation: {}",
            codes.join(", ")
        )));
    }

    let outbound_dir = PathBuf::from(&config.directories.outbound_dir);
    let outbound_path = outbound_dir.join(stem.final_file_name());

    if config.application.dry_run {
        tracing::info!(
            canonical = %canonical_path.display(),
            outbound = %outbound_path.display(),
            checksum = %checksum,
            "Dry run: skipping archive and publish"
        );
        return Ok(FinalizeOutcome {
            stem,
            canonical_path,
            outbound_path,
            checksum,
            archived: Vec::new(),
            report: run.report,
        });
    }

    // Archive-then-publish: history is never overwritten
    let mut archived = Vec::new();
    if let Some(entry) = archive_file(&layout.archive_dir(), &canonical_path)? {
        archived.push(entry);
    }
    if let Some(entry) = archive_file(&layout.archive_dir(), &outbound_path)? {
        archived.push(entry);
    }

    write_atomic(&canonical_path, &bytes)?;

    fs::create_dir_all(&outbound_dir)?;
    write_atomic(&outbound_path, &bytes)?;
    verify_published(&outbound_path, &checksum)?;

    let summary = FinalSummary {
        stem: stem.as_str(),
        status: run.report.status,
        canonical_file: canonical_path.display().to_string(),
        outbound_file: outbound_path.display().to_string(),
        checksum_sha256: &checksum,
        archived: &archived,
        finalized_at: Utc::now(),
    };
    let summary_path = layout.corrected_dir().join("summary_final.json");
    write_atomic(&summary_path, serde_json::to_string_pretty(&summary)?.as_bytes())?;

    render(&run.report, &layout, Utc::now())?;

    tracing::info!(
        stem = %stem,
        canonical = %canonical_path.display(),
        outbound = %outbound_path.display(),
        archived = archived.len(),
        status = %run.report.status,
        "Finalize complete"
    );

    Ok(FinalizeOutcome {
        stem,
        canonical_path,
        outbound_path,
        checksum,
        archived,
        report: run.report,
    })
}

/// Lists this stem's corrected sub-batches in sequence order.
fn corrected_batches(layout: &ReportLayout, stem: &Stem) -> Result<Vec<PathBuf>> {
    let dir = layout.corrected_dir();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let prefix = format!("{}_fixed_", stem.as_str());
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| {
                    name.strip_prefix(&prefix)
                        .and_then(|rest| rest.strip_suffix(".d"))
                        .is_some_and(|seq| {
                            seq.len() == 3 && seq.bytes().all(|b| b.is_ascii_digit())
                        })
                })
        })
        .collect();

    // Three-digit sequence suffixes sort lexicographically in batch order
    paths.sort();
    Ok(paths)
}

/// Reads a record file back into records (extracting and sanitizing).
fn read_records(path: &Path, config: &GateConfig) -> Result<Vec<RawRecord>> {
    let extraction = extract_candidate(path)?;
    let payload = sanitize(&extraction.bytes, &config.sanitizer)?;
    Ok(payload.records().collect())
}

/// Merges record sequences into one canonical sequence: single header,
/// details in order, one trailer recomputed from the merged details.
fn merge_records(sources: Vec<Vec<RawRecord>>) -> Vec<RawRecord> {
    let mut header: Option<RawRecord> = None;
    let mut trailer_template: Option<RawRecord> = None;
    let mut details = Vec::new();

    for records in &sources {
        for record in records {
            match record.kind() {
                RecordKind::Header => {
                    header.get_or_insert_with(|| record.clone());
                }
                RecordKind::Trailer => {
                    trailer_template.get_or_insert_with(|| record.clone());
                }
                RecordKind::Detail => details.push(record.clone()),
                RecordKind::Unknown => {}
            }
        }
    }

    use crate::core::diagnose::{rebuild_trailer, synthesize_trailer};
    let trailer = rebuild_trailer(
        &trailer_template.unwrap_or_else(synthesize_trailer),
        &details,
    );

    let mut merged = Vec::with_capacity(details.len() + 2);
    if let Some(header) = header {
        merged.push(header);
    }
    merged.extend(details);
    merged.push(trailer);
    merged
}

/// Confirms the published copy matches the canonical content.
fn verify_published(path: &Path, expected_checksum: &str) -> Result<()> {
    let published = fs::read(path)?;
    let actual = checksum_bytes(&published);
    if actual != expected_checksum {
        return Err(FhmlError::Io(format!(
            "published copy {} does not match canonical content (checksum {actual} != {expected_checksum})",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RECORD_LEN;
    use tempfile::TempDir;

    fn pad(line: &str) -> String {
        format!("{line:<width$}", width = RECORD_LEN)
    }

    fn config_in(dir: &Path) -> GateConfig {
        let mut config = GateConfig::default();
        config.directories.reports_dir = dir.join("reports").display().to_string();
        config.directories.outbound_dir = dir.join("outbound").display().to_string();
        config
    }

    fn write_clean_source(dir: &Path) -> PathBuf {
        let path = dir.join("TEST.d");
        let content = [
            pad("100      202501150000000042SVC01"),
            pad("200      20250115000000000000150"),
            pad("200      20250115000000000000250"),
            pad("300      00000002000000000000400"),
        ]
        .iter()
        .map(|l| format!("{l}\n"))
        .collect::<String>();
        fs::write(&path, content).unwrap();
        path
    }

    fn validate_file(path: &Path, config: &GateConfig) -> FileReport {
        pipeline::validate_path(path, config).unwrap().report
    }

    #[test]
    fn test_finalize_single_source() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_clean_source(dir.path());
        let report = validate_file(&path, &config);

        let outcome = finalize(&report, &config).unwrap();

        assert!(outcome.canonical_path.is_file());
        assert!(outcome.outbound_path.is_file());
        assert_eq!(
            outcome.canonical_path.file_name().unwrap(),
            "TEST_final.d"
        );
        assert_eq!(
            fs::read(&outcome.canonical_path).unwrap(),
            fs::read(&outcome.outbound_path).unwrap()
        );
        assert!(outcome.archived.is_empty());
        assert_eq!(outcome.report.status, Status::Ok);
    }

    #[test]
    fn test_finalize_twice_archives_and_stays_identical() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_clean_source(dir.path());
        let report = validate_file(&path, &config);

        let first = finalize(&report, &config).unwrap();
        let first_bytes = fs::read(&first.canonical_path).unwrap();

        let second = finalize(&report, &config).unwrap();
        let second_bytes = fs::read(&second.canonical_path).unwrap();

        // Byte-identical content, new archive entries (canonical + outbound)
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first.checksum, second.checksum);
        assert_eq!(second.archived.len(), 2);
        let names: Vec<_> = second
            .archived
            .iter()
            .map(|e| e.archived_path.clone())
            .collect();
        assert_ne!(names[0], names[1]);
        for archived in &second.archived {
            assert!(archived.archived_path.is_file());
        }
    }

    #[test]
    fn test_finalize_refuses_error_content() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = dir.path().join("BAD.d");
        // Bad company code survives merging and cannot be corrected
        let content = [
            pad("100      20250115NOTDIGITS0SVC01"),
            pad("200      20250115000000000000150"),
            pad("300      00000001000000000000150"),
        ]
        .iter()
        .map(|l| format!("{l}\n"))
        .collect::<String>();
        fs::write(&path, content).unwrap();
        let report = validate_file(&path, &config);

        let result = finalize(&report, &config);
        assert!(matches!(result, Err(FhmlError::Format(_))));
        assert!(!dir.path().join("outbound").join("BAD_final.d").exists());
    }

    #[test]
    fn test_merge_recomputes_trailer() {
        let sources = vec![vec![
            RawRecord::from_text(&pad("100      202501150000000042SVC01")),
            RawRecord::from_text(&pad("200      20250115000000000000100")),
            RawRecord::from_text(&pad("300      00000099000000000099999")),
        ]];
        let merged = merge_records(sources);

        assert_eq!(merged.len(), 3);
        let trailer = merged.last().unwrap();
        assert_eq!(trailer.text(9, 17), "00000001");
        assert_eq!(trailer.text(17, 32), "000000000000100");
    }

    #[test]
    fn test_corrected_batches_ordering_and_filtering() {
        let dir = TempDir::new().unwrap();
        let stem = Stem::new("TEST").unwrap();
        let layout = ReportLayout::new(dir.path(), &stem);
        layout.ensure().unwrap();

        for name in [
            "TEST_fixed_002.d",
            "TEST_fixed_001.d",
            "TEST_final.d",
            "TEST_fixed_01.d",
            "OTHER_fixed_001.d",
        ] {
            fs::write(layout.corrected_dir().join(name), b"x").unwrap();
        }

        let batches = corrected_batches(&layout, &stem).unwrap();
        let names: Vec<_> = batches
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["TEST_fixed_001.d", "TEST_fixed_002.d"]);
    }
}
