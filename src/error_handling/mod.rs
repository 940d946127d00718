//! Error handling and processing statistics.
//!
//! This module provides:
//! - The engine's error type and per-record issue reports
//! - Error categorization for failures surfaced through `anyhow`
//! - Processing statistics tracking (errors, info metrics) for batch runs
//!
//! Error types are categorized into:
//! - **Errors**: Failures that drop a record or a whole memento
//! - **Info**: Notable events that change the scored log set (blacklisting, redirects)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_error;
pub use stats::ProcessingStats;
pub use types::{DamageError, ErrorType, InfoType, InitializationError, RecordIssue};
