//! Configuration and constants.
//!
//! This module provides:
//! - Fixed channel weights and scoring constants
//! - HTTP header names and lookup helpers for logged exchanges
//! - Per-computation configuration and CLI option types

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{
    BackgroundColor, BatchArgs, Cli, Command, ComputeArgs, DamageConfig, LogFormat, LogLevel,
    ScoringWeights,
};
