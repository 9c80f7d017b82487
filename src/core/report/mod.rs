//! Report serialization and rendering
//!
//! The JSON serialization of a [`FileReport`] is the canonical interchange
//! artifact consumed by the diagnose and finalize stages; the text digest
//! is a human-readable side artifact and carries no contract. Both are
//! written atomically under the per-stem layout with timestamped names so
//! successive validation passes never overwrite each other.

pub mod layout;

use crate::core::fsutil::write_atomic;
use crate::domain::issue::Severity;
use crate::domain::report::FileReport;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use layout::ReportLayout;
use std::fs;
use std::path::{Path, PathBuf};

/// Locations of the artifacts produced by one render
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub json_path: PathBuf,
    pub txt_path: PathBuf,
}

/// Serializes a report to canonical JSON.
pub fn to_json(report: &FileReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Reads a report back from a JSON file.
pub fn read_report(path: &Path) -> Result<FileReport> {
    let contents = fs::read_to_string(path).map_err(|e| {
        crate::domain::FhmlError::Report(format!("cannot read report {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Writes the structured report and the human digest under the layout.
///
/// Artifact names are `<stem>.<UTC timestamp>.json` / `.txt`.
pub fn render(report: &FileReport, layout: &ReportLayout, now: DateTime<Utc>) -> Result<ReportPaths> {
    layout.ensure()?;

    let timestamp = now.format("%Y%m%d%H%M%S");
    let json_path = layout
        .json_dir()
        .join(format!("{}.{timestamp}.json", report.stem));
    let txt_path = layout
        .txt_dir()
        .join(format!("{}.{timestamp}.txt", report.stem));

    write_atomic(&json_path, to_json(report)?.as_bytes())?;
    write_atomic(&txt_path, digest(report).as_bytes())?;

    tracing::info!(
        json = %json_path.display(),
        txt = %txt_path.display(),
        "Reports written"
    );

    Ok(ReportPaths {
        json_path,
        txt_path,
    })
}

/// Renders the human-readable digest.
pub fn digest(report: &FileReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("File: {}", report.stem));
    lines.push(format!("Source: {}", report.source_path));
    lines.push(format!("Status: {}", report.status));
    lines.push(String::new());
    lines.push("[Records]".to_string());
    lines.push(format!("- Total: {}", report.record_counts_by_kind.total));
    lines.push(format!("- Header: {}", report.record_counts_by_kind.header));
    lines.push(format!("- Detail: {}", report.record_counts_by_kind.detail));
    lines.push(format!(
        "- Trailer: {}",
        report.record_counts_by_kind.trailer
    ));
    if report.record_counts_by_kind.unknown > 0 {
        lines.push(format!(
            "- Unknown: {}",
            report.record_counts_by_kind.unknown
        ));
    }
    lines.push(String::new());

    let errors: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    let warnings: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Warn)
        .collect();

    if !errors.is_empty() {
        lines.push("[Errors]".to_string());
        for issue in &errors {
            lines.push(format_issue_line(issue));
        }
        lines.push(String::new());
    }
    if !warnings.is_empty() {
        lines.push("[Warnings]".to_string());
        for issue in &warnings {
            lines.push(format_issue_line(issue));
        }
        lines.push(String::new());
    }

    lines.push("[Totals]".to_string());
    lines.push(format!(
        "- Declared records: {} / counted {} ({})",
        report.totals_check.declared,
        report.totals_check.actual,
        check_word(report.totals_check.matches)
    ));
    lines.push(format!(
        "- Declared amount: {} / summed {} ({})",
        report.amounts_check.declared,
        report.amounts_check.actual,
        check_word(report.amounts_check.matches)
    ));

    lines.join("\n") + "\n"
}

fn format_issue_line(issue: &crate::domain::issue::ValidationIssue) -> String {
    match issue.record_index {
        Some(index) => format!("- record {index}: {} [{}]", issue.message, issue.code),
        None => format!("- {} [{}]", issue.message, issue.code),
    }
}

fn check_word(matches: bool) -> &'static str {
    if matches {
        "match"
    } else {
        "MISMATCH"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::{IssueCode, Status, ValidationIssue};
    use crate::domain::report::{NewlineKind, RecordCounts, TotalsCheck, REPORT_SCHEMA_VERSION};
    use crate::domain::stem::Stem;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn sample_report() -> FileReport {
        FileReport {
            schema_version: REPORT_SCHEMA_VERSION,
            source_path: "/input/TEST.d".to_string(),
            stem: "TEST".to_string(),
            status: Status::Error,
            record_counts_by_kind: RecordCounts {
                header: 1,
                detail: 2,
                trailer: 1,
                unknown: 0,
                total: 4,
            },
            issues: vec![
                ValidationIssue::warn(IssueCode::BomPresent, "UTF-8 BOM stripped"),
                ValidationIssue::error(IssueCode::TotalMismatch, "declared 3, counted 2")
                    .with_record_index(4),
            ],
            totals_check: TotalsCheck::new(Some(3), 2),
            amounts_check: TotalsCheck::new(Some(300), 300),
            newline: NewlineKind::Lf,
            detail_amount_sum: 300,
        }
    }

    #[test]
    fn test_render_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), &Stem::new("TEST").unwrap());
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

        let paths = render(&sample_report(), &layout, now).unwrap();

        assert_eq!(
            paths.json_path.file_name().unwrap(),
            "TEST.20250115120000.json"
        );
        assert!(paths.json_path.is_file());
        assert!(paths.txt_path.is_file());
    }

    #[test]
    fn test_written_report_round_trips() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), &Stem::new("TEST").unwrap());
        let report = sample_report();

        let paths = render(&report, &layout, Utc::now()).unwrap();
        let restored = read_report(&paths.json_path).unwrap();

        assert_eq!(report, restored);
    }

    #[test]
    fn test_digest_contains_sections() {
        let text = digest(&sample_report());

        assert!(text.contains("Status: ERROR"));
        assert!(text.contains("[Errors]"));
        assert!(text.contains("[Warnings]"));
        assert!(text.contains("record 4: declared 3, counted 2 [TOTAL_MISMATCH]"));
        assert!(text.contains("MISMATCH"));
    }

    #[test]
    fn test_read_report_missing_file() {
        let result = read_report(Path::new("/nonexistent/report.json"));
        assert!(result.is_err());
    }
}
