//! Byte-level sanitization of raw FHML payloads
//!
//! Runs before structural parsing: strips the UTF-8 BOM and embedded null
//! bytes, flags non-ASCII bytes, removes newline delimiters and enforces
//! the exact-240-byte partition invariant. Each anomaly class is recorded
//! as a single WARN issue; only a broken partition invariant is fatal.

use crate::config::SanitizerConfig;
use crate::domain::errors::FhmlError;
use crate::domain::issue::{IssueCode, ValidationIssue};
use crate::domain::record::{RawRecord, RECORD_LEN};
use crate::domain::report::NewlineKind;
use crate::domain::result::Result;

/// UTF-8 byte order mark.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Cleaned payload ready for structural validation
#[derive(Debug)]
pub struct SanitizedPayload {
    /// Newline-free record stream, length an exact multiple of 240
    pub bytes: Vec<u8>,

    /// Newline convention detected in the raw payload
    pub newline: NewlineKind,

    /// WARN issues recorded during cleanup, one per anomaly class
    pub issues: Vec<ValidationIssue>,
}

impl SanitizedPayload {
    /// Number of 240-byte records in the payload.
    pub fn record_count(&self) -> usize {
        self.bytes.len() / RECORD_LEN
    }

    /// Iterates the payload as 240-byte records in file order.
    pub fn records(&self) -> impl Iterator<Item = RawRecord> + '_ {
        self.bytes.chunks_exact(RECORD_LEN).map(|chunk| {
            RawRecord::from_bytes(chunk).expect("chunks_exact yields exact records")
        })
    }
}

/// Sanitizes a raw byte payload.
///
/// # Errors
///
/// Returns `FhmlError::Format` when the cleaned payload is empty or cannot
/// be partitioned into exact 240-byte records. This is unrecoverable for
/// the file and aborts the pipeline before any record-level validation.
pub fn sanitize(raw: &[u8], config: &SanitizerConfig) -> Result<SanitizedPayload> {
    let mut issues = Vec::new();

    let body = if raw.starts_with(&BOM) {
        issues.push(ValidationIssue::warn(
            IssueCode::BomPresent,
            "UTF-8 BOM stripped from start of file",
        ));
        &raw[BOM.len()..]
    } else {
        raw
    };

    let newline = detect_newline(body);

    let mut bytes = Vec::with_capacity(body.len());
    let mut null_positions = 0usize;
    let mut first_null = None;
    let mut non_ascii = 0usize;
    let mut first_non_ascii = None;

    for (pos, &byte) in body.iter().enumerate() {
        match byte {
            b'\r' | b'\n' => continue,
            0 => {
                null_positions += 1;
                first_null.get_or_insert(pos);
            }
            b if b > 0x7F => {
                non_ascii += 1;
                first_non_ascii.get_or_insert(pos);
                bytes.push(if config.replace_non_ascii { b'?' } else { b });
            }
            b => bytes.push(b),
        }
    }

    if let Some(pos) = first_null {
        issues.push(ValidationIssue::warn(
            IssueCode::NullByte,
            format!("{null_positions} null byte(s) stripped, first at byte {pos}"),
        ));
    }
    if let Some(pos) = first_non_ascii {
        let action = if config.replace_non_ascii {
            "replaced with '?'"
        } else {
            "left in place"
        };
        issues.push(ValidationIssue::warn(
            IssueCode::NonAsciiByte,
            format!("{non_ascii} non-ASCII byte(s) {action}, first at byte {pos}"),
        ));
    }

    if bytes.is_empty() {
        return Err(FhmlError::Format(
            "file contains no records after sanitization".to_string(),
        ));
    }

    if bytes.len() % RECORD_LEN != 0 {
        return Err(FhmlError::Format(format!(
            "payload length {} is not a multiple of {RECORD_LEN} ({} stray byte(s))",
            bytes.len(),
            bytes.len() % RECORD_LEN
        )));
    }

    tracing::debug!(
        records = bytes.len() / RECORD_LEN,
        newline = ?newline,
        warnings = issues.len(),
        "Payload sanitized"
    );

    Ok(SanitizedPayload {
        bytes,
        newline,
        issues,
    })
}

/// Detects the newline convention used in the byte payload.
fn detect_newline(data: &[u8]) -> NewlineKind {
    if data.windows(2).any(|w| w == b"\r\n") {
        NewlineKind::Crlf
    } else if data.contains(&b'\n') {
        NewlineKind::Lf
    } else {
        NewlineKind::None
    }
}
