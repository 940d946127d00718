//! Per-resource damage breakdowns.

use serde::Serialize;
use strum_macros::Display;

use crate::geometry::RectangleScore;

/// Which of the two passes a score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScoringMode {
    /// Every logged resource is assumed lost
    Potential,
    /// Only resources that actually failed to load count
    Actual,
}

/// Damage of one image or multimedia resource, summed over its rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GeometricBreakdown {
    pub location: f64,
    pub size: f64,
    pub total: f64,
}

impl From<RectangleScore> for GeometricBreakdown {
    fn from(score: RectangleScore) -> Self {
        GeometricBreakdown {
            location: score.location,
            size: score.size,
            total: score.total,
        }
    }
}

/// Damage of one stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StylesheetBreakdown {
    pub tag: f64,
    pub ratio: f64,
    pub total: f64,
}
