//! Crawler log records.
//!
//! The crawler writes one JSON object per line for every HTTP exchange it saw
//! (generic log), every image and embedded media element it laid out, and every
//! stylesheet it applied. This module turns those lines into validated records:
//!
//! - [`GenericLog`]: url, status and headers; the universe for redirect resolution
//! - [`ImageLog`]: a laid-out resource (image or multimedia) with its rectangles
//! - [`StylesheetLog`]: a stylesheet with its rule importance and screenshot hash
//!
//! Records are validated once at ingestion; a bad line becomes a
//! [`RecordIssue`](crate::error_handling::RecordIssue) instead of aborting the file.

mod ingest;
mod types;

pub use ingest::{parse_log_lines, FromRawLog, Ingested, RawLog};
pub use types::{
    GenericLog, ImageLog, LogKind, Rectangle, Resource, StylesheetLog, ViewportSize,
};
