//! Fixed-width FHML record model
//!
//! An FHML file is a sequence of exact 240-byte records. The first three
//! bytes of every record carry a numeric type code selecting the record
//! kind: `100` header, `200` detail, `300` trailer. Anything else maps to
//! [`RecordKind::Unknown`] rather than failing dispatch.

use crate::domain::errors::FhmlError;
use crate::domain::result::Result;
use std::borrow::Cow;
use std::fmt;

/// Exact width of every FHML record, in bytes.
pub const RECORD_LEN: usize = 240;

/// Type code carried by header records.
pub const HEADER_CODE: &[u8; 3] = b"100";

/// Type code carried by detail records.
pub const DETAIL_CODE: &[u8; 3] = b"200";

/// Type code carried by trailer records.
pub const TRAILER_CODE: &[u8; 3] = b"300";

/// Record kind derived from the leading 3-byte type code
///
/// The mapping from code to kind is closed: unrecognized codes select
/// [`RecordKind::Unknown`], which raises a validation issue but never a
/// parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// File header (type code 100), expected exactly once, in first position
    Header,
    /// Transactional detail (type code 200)
    Detail,
    /// File trailer (type code 300), expected exactly once, in last position
    Trailer,
    /// Any other type code
    Unknown,
}

impl RecordKind {
    /// Derives the record kind from a 3-byte type code.
    pub fn from_code(code: &[u8]) -> Self {
        match code {
            c if c == HEADER_CODE => RecordKind::Header,
            c if c == DETAIL_CODE => RecordKind::Detail,
            c if c == TRAILER_CODE => RecordKind::Trailer,
            _ => RecordKind::Unknown,
        }
    }

    /// Returns the kind name used in logs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Header => "header",
            RecordKind::Detail => "detail",
            RecordKind::Trailer => "trailer",
            RecordKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One exact 240-byte record
///
/// Records are plain byte containers; field decoding happens in the
/// validator against the closed layout table. The type is cheap to clone
/// (a fixed array copy) and carries no heap allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    bytes: [u8; RECORD_LEN],
}

impl RawRecord {
    /// Creates a record from an exact 240-byte slice.
    ///
    /// # Errors
    ///
    /// Returns `FhmlError::Format` when the slice is not exactly 240 bytes.
    pub fn from_bytes(slice: &[u8]) -> Result<Self> {
        if slice.len() != RECORD_LEN {
            return Err(FhmlError::Format(format!(
                "record is {} bytes (expected {RECORD_LEN})",
                slice.len()
            )));
        }
        let mut bytes = [0u8; RECORD_LEN];
        bytes.copy_from_slice(slice);
        Ok(Self { bytes })
    }

    /// Creates a record from text, right-padding with spaces or truncating
    /// to exactly 240 bytes. Used when synthesizing corrected records.
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [b' '; RECORD_LEN];
        let src = text.as_bytes();
        let len = src.len().min(RECORD_LEN);
        bytes[..len].copy_from_slice(&src[..len]);
        Self { bytes }
    }

    /// Returns the record kind derived from the leading type code.
    pub fn kind(&self) -> RecordKind {
        RecordKind::from_code(&self.bytes[..3])
    }

    /// Returns the full 240-byte content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the text content of a byte range.
    ///
    /// The payload is ASCII after sanitization; any byte the sanitizer
    /// left un-replaced is rendered lossily.
    pub fn text(&self, start: usize, end: usize) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes[start..end])
    }

    /// Returns a copy of this record with `text` written into the byte
    /// range `[start, end)`, right-padded with spaces or truncated to the
    /// range width.
    pub fn with_range(&self, start: usize, end: usize, text: &str) -> Self {
        let mut bytes = self.bytes;
        let width = end - start;
        let src = text.as_bytes();
        for (i, slot) in bytes[start..end].iter_mut().enumerate() {
            *slot = if i < src.len().min(width) { src[i] } else { b' ' };
        }
        Self { bytes }
    }
}
