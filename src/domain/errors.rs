//! Domain error types
//!
//! This module defines the error hierarchy for the FHML pipeline.
//! All errors are domain-specific and don't expose third-party types.
//! Recoverable per-record anomalies are never errors; they become
//! [`crate::domain::issue::ValidationIssue`]s instead.

use thiserror::Error;

/// Main pipeline error type
///
/// This is the primary error type used throughout the application.
/// Every variant is a stage-fatal condition: it aborts the stage that
/// raised it and is surfaced to the caller unmodified.
#[derive(Debug, Error)]
pub enum FhmlError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Structural format errors (payload not partitionable into 240-byte records)
    #[error("Format error: {0}")]
    Format(String),

    /// Archive errors (zip extraction or archiving of superseded outputs)
    #[error("Archive error: {0}")]
    Archive(String),

    /// A registered correction rule failed to eliminate its triggering issue,
    /// or an ERROR-class issue has no registered rule
    #[error("Correction failure: {0}")]
    Correction(String),

    /// Report serialization/deserialization errors
    #[error("Report error: {0}")]
    Report(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FhmlError {
    fn from(err: std::io::Error) -> Self {
        FhmlError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FhmlError {
    fn from(err: serde_json::Error) -> Self {
        FhmlError::Report(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FhmlError {
    fn from(err: toml::de::Error) -> Self {
        FhmlError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from zip extraction errors
impl From<zip::result::ZipError> for FhmlError {
    fn from(err: zip::result::ZipError) -> Self {
        FhmlError::Archive(err.to_string())
    }
}
