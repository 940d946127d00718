//! Parsing and validation of crawler log lines.
//!
//! Lines are deserialized into a permissive [`RawLog`] first and then validated into
//! the typed record for their log. Invalid lines are collected as issues; the rest of
//! the file is still read.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error_handling::{DamageError, RecordIssue};

use super::types::{GenericLog, ImageLog, LogKind, Rectangle, StylesheetLog, ViewportSize};

/// A log line as written by the crawler, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawLog {
    pub url: Option<String>,
    #[serde(default)]
    pub status_code: Value,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub viewport_size: Value,
    #[serde(default)]
    pub rectangles: Option<Vec<RawRectangle>>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// A rectangle as written by the crawler.
#[derive(Debug, Deserialize)]
pub struct RawRectangle {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Validated records of one log file, plus the lines that were rejected.
#[derive(Debug)]
pub struct Ingested<T> {
    pub records: Vec<T>,
    pub issues: Vec<RecordIssue>,
}

impl<T> Default for Ingested<T> {
    fn default() -> Self {
        Ingested {
            records: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// Conversion from a raw log line into a validated record.
pub trait FromRawLog: Sized {
    /// Validates `raw`. `kind` is the log it came from; `line` its 1-based line number.
    fn from_raw(raw: RawLog, kind: LogKind, line: Option<usize>) -> Result<Self, DamageError>;
}

/// Parses every non-blank line of a JSON Lines log.
///
/// # Arguments
///
/// * `kind` - Which log the text belongs to (used in error reports)
/// * `text` - The whole file contents
///
/// # Returns
///
/// The records that validated, in file order, and one issue per rejected line.
pub fn parse_log_lines<T: FromRawLog>(kind: LogKind, text: &str) -> Ingested<T> {
    let mut ingested = Ingested::default();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let line_no = Some(idx + 1);

        let parsed = serde_json::from_str::<RawLog>(trimmed)
            .map_err(|e| DamageError::malformed(kind, line_no, format!("invalid JSON: {}", e)));
        let url = parsed.as_ref().ok().and_then(|raw| raw.url.clone());

        match parsed.and_then(|raw| T::from_raw(raw, kind, line_no)) {
            Ok(record) => ingested.records.push(record),
            Err(e) => {
                log::warn!("Skipping {} log line {}: {}", kind, idx + 1, e);
                ingested
                    .issues
                    .push(RecordIssue::new(kind, url.as_deref(), &e));
            }
        }
    }

    log::debug!(
        "Read {} {} log records ({} rejected)",
        ingested.records.len(),
        kind,
        ingested.issues.len()
    );
    ingested
}

fn require_url(raw_url: Option<String>, kind: LogKind, line: Option<usize>) -> Result<String, DamageError> {
    match raw_url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        Some(_) => Err(DamageError::malformed(kind, line, "empty url")),
        None => Err(DamageError::malformed(kind, line, "missing url")),
    }
}

/// Accepts a number, a `[number, ...]` pair (older crawler output) or null.
fn parse_status(value: &Value, kind: LogKind, line: Option<usize>) -> Result<Option<u16>, DamageError> {
    let number = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Ok(None),
        },
        other => other,
    };

    number
        .as_u64()
        .filter(|status| *status <= 999)
        .map(|status| Some(status as u16))
        .ok_or_else(|| DamageError::malformed(kind, line, format!("invalid status_code {}", value)))
}

fn parse_headers(raw: Option<BTreeMap<String, Value>>) -> BTreeMap<String, String> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((name, s)),
            other => Some((name, other.to_string())),
        })
        .collect()
}

/// Missing or unusable viewports degrade to zero area rather than rejecting the record.
fn parse_viewport(value: &Value, url: &str) -> ViewportSize {
    let dims: Option<Vec<f64>> = value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_f64).collect());

    match dims.as_deref() {
        Some([w, h]) if w.is_finite() && h.is_finite() && *w >= 0.0 && *h >= 0.0 => {
            ViewportSize::new(*w, *h)
        }
        _ => {
            log::debug!("Unusable viewport_size {} for {}, scoring against zero area", value, url);
            ViewportSize::ZERO
        }
    }
}

fn parse_rectangles(
    raw: Option<Vec<RawRectangle>>,
    kind: LogKind,
    line: Option<usize>,
) -> Result<Vec<Rectangle>, DamageError> {
    let mut rectangles = Vec::new();
    for (idx, rect) in raw.unwrap_or_default().into_iter().enumerate() {
        let (left, top, width, height) = match (rect.left, rect.top, rect.width, rect.height) {
            (Some(l), Some(t), Some(w), Some(h)) => (l, t, w, h),
            _ => {
                return Err(DamageError::malformed(
                    kind,
                    line,
                    format!("rectangle {} is missing a coordinate", idx),
                ))
            }
        };
        if ![left, top, width, height].iter().all(|v| v.is_finite()) {
            return Err(DamageError::malformed(
                kind,
                line,
                format!("rectangle {} has a non-finite coordinate", idx),
            ));
        }
        if width < 0.0 || height < 0.0 {
            return Err(DamageError::malformed(
                kind,
                line,
                format!("rectangle {} has negative size {}x{}", idx, width, height),
            ));
        }
        rectangles.push(Rectangle::new(left, top, width, height));
    }
    Ok(rectangles)
}

impl FromRawLog for GenericLog {
    fn from_raw(raw: RawLog, kind: LogKind, line: Option<usize>) -> Result<Self, DamageError> {
        let url = require_url(raw.url, kind, line)?;
        Ok(GenericLog {
            status_code: parse_status(&raw.status_code, kind, line)?,
            headers: parse_headers(raw.headers),
            url,
        })
    }
}

impl FromRawLog for ImageLog {
    fn from_raw(raw: RawLog, kind: LogKind, line: Option<usize>) -> Result<Self, DamageError> {
        let url = require_url(raw.url, kind, line)?;
        let status_code = parse_status(&raw.status_code, kind, line)?;
        let viewport_size = parse_viewport(&raw.viewport_size, &url);
        let rectangles = parse_rectangles(raw.rectangles, kind, line)?;

        let mut log = ImageLog::new(url, status_code, viewport_size, rectangles);
        log.headers = parse_headers(raw.headers);
        Ok(log)
    }
}

impl FromRawLog for StylesheetLog {
    fn from_raw(raw: RawLog, kind: LogKind, line: Option<usize>) -> Result<Self, DamageError> {
        let url = require_url(raw.url, kind, line)?;
        let importance = raw
            .importance
            .ok_or_else(|| DamageError::malformed(kind, line, "missing importance"))?;
        if !importance.is_finite() || importance < 0.0 {
            return Err(DamageError::malformed(
                kind,
                line,
                format!("importance must be a non-negative number, got {}", importance),
            ));
        }
        let hash = match raw.hash {
            Some(hash) if !hash.trim().is_empty() => hash,
            _ => return Err(DamageError::malformed(kind, line, "missing hash")),
        };

        let mut log = StylesheetLog::new(url, importance, hash);
        log.status_code = parse_status(&raw.status_code, kind, line)?;
        log.headers = parse_headers(raw.headers);
        Ok(log)
    }
}
