//! Diagnosis and correction of faulty files
//!
//! Consumes a file report, applies the registered correction rule for
//! each ERROR issue and repartitions the file into corrected sub-batches
//! under `reports/<stem>/corrigido/`. A report with zero ERROR issues is
//! a strict no-op. Every sub-batch is re-validated through the regular
//! pipeline; a correction that fails to eliminate its triggering issue is
//! a fatal [`FhmlError::Correction`], never a silent pass-through.

pub mod rules;

use crate::config::GateConfig;
use crate::core::extract::extract_candidate;
use crate::core::fsutil::write_atomic;
use crate::core::pipeline;
use crate::core::report::layout::ReportLayout;
use crate::core::report::render;
use crate::core::sanitize::sanitize;
use crate::core::validate::layout;
use crate::domain::errors::FhmlError;
use crate::domain::issue::IssueCode;
use crate::domain::record::{RawRecord, RecordKind};
use crate::domain::report::FileReport;
use crate::domain::result::Result;
use crate::domain::stem::Stem;
use chrono::Utc;
use rules::{rule_for, CorrectionRule};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One corrected sub-batch artifact
#[derive(Debug)]
pub struct CorrectedBatch {
    /// 1-based sequence number
    pub sequence: usize,

    /// Location of the corrected record file
    pub path: PathBuf,

    /// Report from re-validating the corrected content
    pub report: FileReport,
}

/// Outcome of one diagnose pass
#[derive(Debug)]
pub struct DiagnoseOutcome {
    /// Corrected sub-batches, empty when the report had no ERROR issues
    pub batches: Vec<CorrectedBatch>,

    /// Names of the rules that were applied
    pub rules_applied: Vec<&'static str>,
}

impl DiagnoseOutcome {
    fn noop() -> Self {
        Self {
            batches: Vec::new(),
            rules_applied: Vec::new(),
        }
    }
}

/// Diagnoses a report and writes corrected sub-batches.
///
/// # Errors
///
/// Returns `FhmlError::Correction` when an ERROR issue has no registered
/// rule, or when a corrected sub-batch still raises one of the issues the
/// corrections were meant to eliminate.
pub fn diagnose(report: &FileReport, config: &GateConfig) -> Result<DiagnoseOutcome> {
    let errors: Vec<_> = report.error_issues().collect();
    if errors.is_empty() {
        tracing::info!(stem = %report.stem, "No ERROR issues, nothing to correct");
        return Ok(DiagnoseOutcome::noop());
    }

    // Resolve every ERROR issue to its registered rule before touching
    // anything; an unregistered code aborts the whole pass
    let mut plan = Vec::new();
    for &issue in &errors {
        let rule = rule_for(issue).ok_or_else(|| {
            FhmlError::Correction(format!(
                "no registered correction rule for {} (field {:?})",
                issue.code, issue.field
            ))
        })?;
        plan.push((issue, rule));
    }

    let triggered: BTreeSet<&'static str> =
        plan.iter().map(|(issue, _)| issue.code.as_str()).collect();
    let rule_set: BTreeSet<CorrectionRule> = plan.iter().map(|(_, rule)| rule).copied().collect();
    tracing::info!(
        stem = %report.stem,
        errors = errors.len(),
        rules = ?rule_set.iter().map(|r| r.name()).collect::<Vec<_>>(),
        "Applying corrections"
    );

    let stem = Stem::new(report.stem.clone()).map_err(FhmlError::Format)?;
    let extraction = extract_candidate(Path::new(&report.source_path))?;
    let payload = sanitize(&extraction.bytes, &config.sanitizer)?;
    let records: Vec<RawRecord> = payload.records().collect();

    let corrected = build_corrected_batches(&records, &plan, config);

    let layout = ReportLayout::new(&config.directories.reports_dir, &stem);
    layout.ensure()?;

    let mut batches = Vec::new();
    for (sequence, batch_records) in corrected.iter().enumerate() {
        let sequence = sequence + 1;
        let batch_path = layout.corrected_dir().join(stem.batch_file_name(sequence));
        let bytes = serialize_records(batch_records);

        if config.application.dry_run {
            tracing::info!(path = %batch_path.display(), "Dry run: would write corrected batch");
        } else {
            write_atomic(&batch_path, &bytes)?;
        }

        // Recursive re-validation through the regular pipeline
        let batch_stem = stem.batch_stem(sequence);
        let run = pipeline::validate_bytes(&bytes, &batch_path, &batch_stem, config)?;

        if let Some(stale) = run
            .report
            .error_issues()
            .find(|i| triggered.contains(i.code.as_str()))
        {
            return Err(FhmlError::Correction(format!(
                "batch {sequence} still raises {} after correction: {}",
                stale.code, stale.message
            )));
        }

        if !config.application.dry_run {
            let batch_layout = ReportLayout::new(&config.directories.reports_dir, &batch_stem);
            render(&run.report, &batch_layout, Utc::now())?;
        }

        tracing::info!(
            batch = sequence,
            path = %batch_path.display(),
            status = %run.report.status,
            "Corrected batch re-validated"
        );

        batches.push(CorrectedBatch {
            sequence,
            path: batch_path,
            report: run.report,
        });
    }

    Ok(DiagnoseOutcome {
        batches,
        rules_applied: rule_set.iter().map(|r| r.name()).collect(),
    })
}

/// Applies the planned corrections and partitions the result into batches
/// of at most `max_records_per_batch` detail records.
fn build_corrected_batches(
    records: &[RawRecord],
    plan: &[(&crate::domain::issue::ValidationIssue, CorrectionRule)],
    config: &GateConfig,
) -> Vec<Vec<RawRecord>> {
    let drop_indices: BTreeSet<usize> = plan
        .iter()
        .filter_map(|(issue, rule)| {
            if *rule == CorrectionRule::DropRecord {
                issue.record_index
            } else {
                None
            }
        })
        .collect();

    let rewrite_header_date = plan.iter().any(|(issue, rule)| {
        *rule == CorrectionRule::RebuildHeader
            && (issue.code == IssueCode::FieldDate || issue.code == IssueCode::HeaderMissing)
    });

    let mut header: Option<RawRecord> = None;
    let mut trailer_template: Option<RawRecord> = None;
    let mut details = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let index = index + 1;
        match record.kind() {
            RecordKind::Header => {
                // Extra headers are discarded; first one wins
                header.get_or_insert_with(|| record.clone());
            }
            RecordKind::Trailer => {
                trailer_template.get_or_insert_with(|| record.clone());
            }
            RecordKind::Detail => {
                if !drop_indices.contains(&index) {
                    details.push(record.clone());
                }
            }
            // Unknown records have no place in a corrected batch
            RecordKind::Unknown => {}
        }
    }

    let today = Utc::now().date_naive().format("%Y%m%d").to_string();
    let mut header = header.unwrap_or_else(|| synthesize_header(&today));
    if rewrite_header_date {
        header = header.with_range(
            layout::HEADER_GENERATION_DATE.start,
            layout::HEADER_GENERATION_DATE.end,
            &today,
        );
    }
    let trailer_template = trailer_template.unwrap_or_else(synthesize_trailer);

    let max = config.diagnose.max_records_per_batch;
    let chunks: Vec<&[RawRecord]> = if details.is_empty() {
        vec![&[]]
    } else {
        details.chunks(max).collect()
    };

    chunks
        .into_iter()
        .map(|chunk| {
            let mut batch = Vec::with_capacity(chunk.len() + 2);
            batch.push(header.clone());
            batch.extend_from_slice(chunk);
            batch.push(rebuild_trailer(&trailer_template, chunk));
            batch
        })
        .collect()
}

/// Writes recomputed totals into a trailer record.
///
/// Also used by the finalize stage when rebuilding the merged trailer.
pub fn rebuild_trailer(template: &RawRecord, details: &[RawRecord]) -> RawRecord {
    let count = details.len() as u64;
    let sum: u64 = details
        .iter()
        .filter_map(|record| {
            let text = layout::DETAIL_AMOUNT_CENTS.extract(record);
            let value = text.trim();
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                value.parse::<u64>().ok()
            }
        })
        .sum();

    template
        .with_range(
            layout::TRAILER_RECORD_COUNT.start,
            layout::TRAILER_RECORD_COUNT.end,
            &format!("{count:08}"),
        )
        .with_range(
            layout::TRAILER_TOTAL_AMOUNT.start,
            layout::TRAILER_TOTAL_AMOUNT.end,
            &format!("{sum:015}"),
        )
}

fn synthesize_header(date: &str) -> RawRecord {
    RawRecord::from_text("100").with_range(
        layout::HEADER_GENERATION_DATE.start,
        layout::HEADER_GENERATION_DATE.end,
        date,
    )
    .with_range(
        layout::HEADER_COMPANY_CODE.start,
        layout::HEADER_COMPANY_CODE.end,
        "0000000000",
    )
}

/// A blank trailer record carrying only its type code.
pub fn synthesize_trailer() -> RawRecord {
    RawRecord::from_text("300")
}

/// Serializes records with LF delimiters, one record per line.
pub fn serialize_records(records: &[RawRecord]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(records.len() * (crate::domain::RECORD_LEN + 1));
    for record in records {
        bytes.extend_from_slice(record.as_bytes());
        bytes.push(b'\n');
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::{Status, ValidationIssue};
    use crate::domain::record::RECORD_LEN;
    use std::fs;
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

    fn write_source(dir: &Path, lines: &[String]) -> PathBuf {
        let path = dir.join("TEST.d");
        let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
        fs::write(&path, content).unwrap();
        path
    }

    fn validate_file(path: &Path, config: &GateConfig) -> FileReport {
        pipeline::validate_path(path, config).unwrap().report
    }

    #[test]
    fn test_noop_on_clean_report() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_source(
            dir.path(),
            &[
                pad("100      202501150000000042SVC01"),
                pad("200      20250115000000000000150"),
                pad("300      00000001000000000000150"),
            ],
        );

        let report = validate_file(&path, &config);
        assert_eq!(report.status, Status::Ok);

        let outcome = diagnose(&report, &config).unwrap();
        assert!(outcome.batches.is_empty());
        assert!(outcome.rules_applied.is_empty());
    }

    #[test]
    fn test_trailer_recompute() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_source(
            dir.path(),
            &[
                pad("100      202501150000000042SVC01"),
                pad("200      20250115000000000000150"),
                pad("200      20250115000000000000250"),
                pad("300      00000099000000000000150"),
            ],
        );

        let report = validate_file(&path, &config);
        assert_eq!(report.status, Status::Error);

        let outcome = diagnose(&report, &config).unwrap();
        assert_eq!(outcome.batches.len(), 1);
        assert_eq!(outcome.batches[0].report.status, Status::Ok);
        assert!(outcome.rules_applied.contains(&"rebuild-trailer"));

        // The corrected file declares the recomputed totals
        let corrected = fs::read_to_string(&outcome.batches[0].path).unwrap();
        let trailer = corrected.lines().last().unwrap();
        assert_eq!(&trailer[9..17], "00000002");
        assert_eq!(&trailer[17..32], "000000000000400");
    }

    #[test]
    fn test_drop_irreparable_detail() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_source(
            dir.path(),
            &[
                pad("100      202501150000000042SVC01"),
                pad("200      20250115000000000000150"),
                pad("200      abcdefgh000000000000250"), // bad date, dropped
                pad("300      00000002000000000000400"),
            ],
        );

        let report = validate_file(&path, &config);
        let outcome = diagnose(&report, &config).unwrap();

        assert_eq!(outcome.batches.len(), 1);
        let batch = &outcome.batches[0];
        assert_eq!(batch.report.record_counts_by_kind.detail, 1);
        assert_eq!(batch.report.status, Status::Ok);
    }

    #[test]
    fn test_split_oversized_file() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(dir.path());
        config.diagnose.max_records_per_batch = 2;

        let mut lines = vec![pad("100      202501150000000042SVC01")];
        for i in 0..5 {
            lines.push(pad(&format!("200      20250115{:015}", 100 + i)));
        }
        lines.push(pad(&format!("300      {:08}{:015}", 5, 510)));
        let path = write_source(dir.path(), &lines);

        let report = validate_file(&path, &config);
        let outcome = diagnose(&report, &config).unwrap();

        assert_eq!(outcome.batches.len(), 3);
        assert!(outcome.rules_applied.contains(&"split-batch"));
        for (i, batch) in outcome.batches.iter().enumerate() {
            assert_eq!(batch.sequence, i + 1);
            assert_eq!(batch.report.status, Status::Ok);
            assert!(batch
                .path
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with(&format!("_fixed_{:03}.d", i + 1)));
        }
        // Order preserved across batches: 2 + 2 + 1 details
        assert_eq!(outcome.batches[0].report.record_counts_by_kind.detail, 2);
        assert_eq!(outcome.batches[2].report.record_counts_by_kind.detail, 1);
    }

    #[test]
    fn test_unregistered_rule_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let path = write_source(
            dir.path(),
            &[
                pad("100      20250115badcompany"), // company code not numeric
                pad("200      20250115000000000000150"),
                pad("300      00000001000000000000150"),
            ],
        );

        let report = validate_file(&path, &config);
        let result = diagnose(&report, &config);
        assert!(matches!(result, Err(FhmlError::Correction(_))));
    }

    #[test]
    fn test_rebuild_trailer_totals() {
        let details = vec![
            RawRecord::from_text(&pad("200      20250115000000000000100")),
            RawRecord::from_text(&pad("200      20250115000000000000200")),
        ];
        let trailer = rebuild_trailer(&synthesize_trailer(), &details);
        assert_eq!(trailer.text(9, 17), "00000002");
        assert_eq!(trailer.text(17, 32), "000000000000300");
    }

    #[test]
    fn test_serialize_records_round_trip() {
        let records = vec![
            RawRecord::from_text("100"),
            RawRecord::from_text("300"),
        ];
        let bytes = serialize_records(&records);
        assert_eq!(bytes.len(), 2 * (RECORD_LEN + 1));
        assert_eq!(bytes[RECORD_LEN], b'\n');
    }

    #[test]
    fn test_issue_without_rule_lookup() {
        let issue = ValidationIssue::error(IssueCode::FieldNumeric, "bad").with_field("company_code");
        assert!(rule_for(&issue).is_none());
    }
}
