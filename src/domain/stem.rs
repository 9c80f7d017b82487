//! File stem newtype with canonicalization
//!
//! The stem is the base identifier of an FHML file (its name without
//! extension). It keys the per-file report tree, the archive location and
//! the outbound artifact name. Corrected sub-batches and finalized outputs
//! derive their names from the stem, so canonicalization must strip those
//! derived suffixes to recover the original identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File stem newtype wrapper
///
/// # Examples
///
/// ```
/// use fhml_gate::domain::stem::Stem;
///
/// let stem = Stem::new("HMLMAC12.D250115").unwrap();
/// assert_eq!(stem.as_str(), "HMLMAC12.D250115");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stem(String);

impl Stem {
    /// Creates a new stem from a string.
    ///
    /// # Errors
    ///
    /// Returns an error when the stem is empty or contains path separators
    /// (a stem is a file name component, never a path).
    pub fn new(stem: impl Into<String>) -> Result<Self, String> {
        let stem = stem.into();
        if stem.trim().is_empty() {
            return Err("stem cannot be empty".to_string());
        }
        if stem.contains('/') || stem.contains('\\') {
            return Err(format!("stem cannot contain path separators: {stem}"));
        }
        Ok(Self(stem))
    }

    /// Derives the stem from a file path (file name without extension).
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| format!("cannot derive stem from path: {}", path.display()))?;
        Self::new(stem)
    }

    /// Returns the stem as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the canonical stem, with any trailing `_final` or
    /// `_fixed_NNN` suffixes stripped, iteratively, so derived artifacts
    /// never compound (`X_fixed_001_final` canonicalizes to `X`).
    pub fn canonical(&self) -> Stem {
        let mut s = self.0.as_str();
        loop {
            if let Some(rest) = s.strip_suffix("_final") {
                if !rest.is_empty() {
                    s = rest;
                    continue;
                }
            }
            if let Some(rest) = strip_fixed_suffix(s) {
                if !rest.is_empty() {
                    s = rest;
                    continue;
                }
            }
            break;
        }
        Stem(s.to_string())
    }

    /// Name of the corrected sub-batch file for a 1-based sequence number.
    pub fn batch_file_name(&self, sequence: usize) -> String {
        format!("{}_fixed_{sequence:03}.d", self.0)
    }

    /// Stem of the corrected sub-batch for a 1-based sequence number.
    pub fn batch_stem(&self, sequence: usize) -> Stem {
        Stem(format!("{}_fixed_{sequence:03}", self.0))
    }

    /// Name of the canonical finalized file.
    pub fn final_file_name(&self) -> String {
        format!("{}_final.d", self.0)
    }
}

/// Strips a `_fixed_NNN` suffix (exactly three digits) when present.
fn strip_fixed_suffix(s: &str) -> Option<&str> {
    let (rest, digits) = s.split_at(s.len().checked_sub(3)?);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.strip_suffix("_fixed_")
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Stem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Stem {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_stem_rejects_empty() {
        assert!(Stem::new("").is_err());
        assert!(Stem::new("   ").is_err());
    }

    #[test]
    fn test_stem_rejects_path_separators() {
        assert!(Stem::new("a/b").is_err());
        assert!(Stem::new("a\\b").is_err());
    }

    #[test]
    fn test_stem_from_path() {
        let stem = Stem::from_path(&PathBuf::from("/input/HMLMAC12.D250115.d")).unwrap();
        assert_eq!(stem.as_str(), "HMLMAC12.D250115");
    }

    #[test]
    fn test_canonical_passthrough() {
        let stem = Stem::new("HMLMAC12").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12");
    }

    #[test]
    fn test_canonical_strips_final() {
        let stem = Stem::new("HMLMAC12_final").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12");
    }

    #[test]
    fn test_canonical_strips_fixed() {
        let stem = Stem::new("HMLMAC12_fixed_003").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12");
    }

    #[test]
    fn test_canonical_strips_compound_suffixes() {
        let stem = Stem::new("HMLMAC12_fixed_001_final").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12");

        let stem = Stem::new("HMLMAC12_final_final").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12");
    }

    #[test]
    fn test_canonical_keeps_lookalike_suffixes() {
        // Only exactly three digits qualify as a batch suffix
        let stem = Stem::new("HMLMAC12_fixed_1").unwrap();
        assert_eq!(stem.canonical().as_str(), "HMLMAC12_fixed_1");
    }

    #[test]
    fn test_batch_and_final_names() {
        let stem = Stem::new("HMLMAC12").unwrap();
        assert_eq!(stem.batch_file_name(7), "HMLMAC12_fixed_007.d");
        assert_eq!(stem.batch_stem(7).as_str(), "HMLMAC12_fixed_007");
        assert_eq!(stem.final_file_name(), "HMLMAC12_final.d");
    }
}
