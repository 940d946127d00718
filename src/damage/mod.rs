//! The damage computation engine.
//!
//! This module provides:
//! - The per-resource breakdown types attached to scored records
//! - The aggregator turning channel totals into potential and actual damage
//! - [`DamageEngine`], which runs the whole pipeline for one memento
//!
//! The pipeline is: blacklist filter, redirect resolution, viewport coverage, then
//! a potential pass (every resource counts) and an actual pass (only resources
//! that failed to load count), each scoring images and multimedia geometrically
//! and stylesheets by screenshot whitespace.

pub mod aggregate;
mod engine;
mod types;

pub use aggregate::{
    aggregate, text_damage, total_damage_ratio, ChannelTotals, ChannelWeights, DamageSummary,
    TextStats,
};
pub use engine::{DamageEngine, DamageInputs, DamageReport, Diagnostics};
pub use types::{GeometricBreakdown, ScoringMode, StylesheetBreakdown};
