//! Shared helpers for integration tests

use fhml_gate::config::GateConfig;
use fhml_gate::domain::record::RECORD_LEN;
use std::fs;
use std::path::{Path, PathBuf};

/// Pads a line to the exact 240-byte record width.
pub fn pad(line: &str) -> String {
    format!("{line:<width$}", width = RECORD_LEN)
}

/// A well-formed header record line.
pub fn header_line() -> String {
    pad("100      202501150000000042SVC01")
}

/// A detail record line with the given amount in cents.
pub fn detail_line(amount: u64) -> String {
    pad(&format!("200      20250115{amount:015}"))
}

/// A trailer record line declaring the given count and total.
pub fn trailer_line(count: u64, total: u64) -> String {
    pad(&format!("300      {count:08}{total:015}"))
}

/// Writes record lines (LF-delimited) to `<dir>/<name>`.
pub fn write_record_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let content: String = lines.iter().map(|l| format!("{l}\n")).collect();
    fs::write(&path, content).unwrap();
    path
}

/// A configuration rooted inside the test directory.
pub fn test_config(root: &Path) -> GateConfig {
    let mut config = GateConfig::default();
    config.directories.reports_dir = root.join("reports").display().to_string();
    config.directories.outbound_dir = root.join("outbound").display().to_string();
    config
}
