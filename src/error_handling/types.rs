//! Error type definitions.
//!
//! This module defines the engine error, the per-record issue report and the error
//! and info categories counted by the batch runner.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::logs::LogKind;
use crate::utils::sanitize::sanitize_and_truncate_error_message;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors raised by the damage engine.
#[derive(Error, Debug)]
pub enum DamageError {
    /// A screenshot needed for actual stylesheet scoring is missing or cannot be decoded.
    #[error("Screenshot unavailable at {}: {reason}", .path.display())]
    AssetUnavailable { path: PathBuf, reason: String },

    /// A log record failed validation at ingestion.
    #[error("Malformed {kind} log record{}: {reason}", line_suffix(.line))]
    MalformedLogRecord {
        kind: LogKind,
        line: Option<usize>,
        reason: String,
    },

    /// A background colour hint is not a six digit hex colour.
    #[error("Invalid background colour '{0}' (expected RRGGBB)")]
    InvalidBackgroundColor(String),
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl DamageError {
    /// Builds a `MalformedLogRecord` error.
    pub fn malformed(kind: LogKind, line: Option<usize>, reason: impl Into<String>) -> Self {
        DamageError::MalformedLogRecord {
            kind,
            line,
            reason: reason.into(),
        }
    }

    /// The statistics category of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            DamageError::AssetUnavailable { .. } => ErrorType::AssetUnavailable,
            DamageError::MalformedLogRecord { .. } => ErrorType::MalformedLogRecord,
            DamageError::InvalidBackgroundColor(_) => ErrorType::InvalidBackgroundColor,
        }
    }
}

/// A record that was dropped from scoring, reported back with the result.
#[derive(Debug, Clone, Serialize)]
pub struct RecordIssue {
    /// Log the record came from
    pub kind: LogKind,
    /// URL of the record, when it got far enough to have one
    pub url: Option<String>,
    /// Failure category
    pub error: ErrorType,
    /// Sanitized error message
    pub message: String,
}

impl RecordIssue {
    pub fn new(kind: LogKind, url: Option<&str>, error: &DamageError) -> Self {
        RecordIssue {
            kind,
            url: url.map(str::to_string),
            error: error.error_type(),
            message: sanitize_and_truncate_error_message(&error.to_string()),
        }
    }
}

/// Types of errors counted while scoring mementos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Per-record errors
    MalformedLogRecord,
    AssetUnavailable,
    // Per-memento errors
    InvalidBackgroundColor,
    CacheReadError,
    ComputationFailed,
    ComputationTimeout,
}

/// Types of informational metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    BlacklistedResource, // Removed by URL prefix or donotnegotiate Link header
    RedirectCollapsed,   // Record rewritten onto its final URL
    RedirectLoop,        // Redirect walk stopped on a revisited URL
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MalformedLogRecord => "Malformed log record",
            ErrorType::AssetUnavailable => "Asset unavailable",
            ErrorType::InvalidBackgroundColor => "Invalid background colour",
            ErrorType::CacheReadError => "Cache read error",
            ErrorType::ComputationFailed => "Computation failed",
            ErrorType::ComputationTimeout => "Computation timeout",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::BlacklistedResource => "Blacklisted resource",
            InfoType::RedirectCollapsed => "Redirect collapsed",
            InfoType::RedirectLoop => "Redirect loop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_damage_error_messages() {
        let err = DamageError::malformed(LogKind::Image, Some(3), "negative width");
        assert_eq!(
            err.to_string(),
            "Malformed image log record at line 3: negative width"
        );

        let err = DamageError::malformed(LogKind::Stylesheet, None, "missing hash");
        assert_eq!(err.to_string(), "Malformed stylesheet log record: missing hash");

        let err = DamageError::AssetUnavailable {
            path: PathBuf::from("/tmp/abc.png"),
            reason: "No such file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Screenshot unavailable at /tmp/abc.png: No such file"
        );
    }

    #[test]
    fn test_damage_error_categories() {
        assert_eq!(
            DamageError::malformed(LogKind::Generic, None, "x").error_type(),
            ErrorType::MalformedLogRecord
        );
        assert_eq!(
            DamageError::InvalidBackgroundColor("nope".into()).error_type(),
            ErrorType::InvalidBackgroundColor
        );
    }

    #[test]
    fn test_record_issue_serializes_category_text() {
        let err = DamageError::malformed(LogKind::Multimedia, Some(1), "bad\u{0007} bell");
        let issue = RecordIssue::new(LogKind::Multimedia, Some("http://a/v.mp4"), &err);
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["kind"], "multimedia");
        assert_eq!(value["url"], "http://a/v.mp4");
        assert_eq!(value["error"], "Malformed log record");
        assert!(!value["message"].as_str().unwrap().contains('\u{0007}'));
    }

    #[test]
    fn test_all_types_have_string_representation() {
        for error_type in ErrorType::iter() {
            assert!(!error_type.as_str().is_empty(), "{:?}", error_type);
        }
        for info_type in InfoType::iter() {
            assert!(!info_type.as_str().is_empty(), "{:?}", info_type);
        }
    }
}
