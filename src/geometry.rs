//! Geometric damage of laid-out resources.
//!
//! A missing resource hurts more the larger it is and the closer it sits to the
//! middle of the viewport. Each rectangle scores a location importance (half the
//! centrality weight per viewport centre line it crosses) and a size importance
//! (its share of the viewport area times the size weight).

use serde::Serialize;

use crate::config::ScoringWeights;
use crate::logs::{Rectangle, ViewportSize};

/// Score of one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RectangleScore {
    pub location: f64,
    pub size: f64,
    pub total: f64,
}

impl std::ops::Add for RectangleScore {
    type Output = RectangleScore;

    fn add(self, other: RectangleScore) -> RectangleScore {
        RectangleScore {
            location: self.location + other.location,
            size: self.size + other.size,
            total: self.total + other.total,
        }
    }
}

impl std::iter::Sum for RectangleScore {
    fn sum<I: Iterator<Item = RectangleScore>>(iter: I) -> Self {
        iter.fold(RectangleScore::default(), |acc, score| acc + score)
    }
}

/// Scores every rectangle of a resource against its viewport.
///
/// # Arguments
///
/// * `viewport` - Viewport the rectangles were laid out in
/// * `rectangles` - On-page occurrences of the resource
/// * `weights` - Size and centrality weights
///
/// # Returns
///
/// One score per rectangle, in order. Against a zero-area viewport every score is 0.
pub fn score_rectangles(
    viewport: ViewportSize,
    rectangles: &[Rectangle],
    weights: &ScoringWeights,
) -> Vec<RectangleScore> {
    if !viewport.is_measurable() {
        return vec![RectangleScore::default(); rectangles.len()];
    }

    let middle_x = viewport.width / 2.0;
    let middle_y = viewport.height / 2.0;

    rectangles
        .iter()
        .map(|rect| {
            let mut location = 0.0;
            if rect.left < middle_x && rect.left + rect.width > middle_x {
                location += weights.centrality / 2.0;
            }
            if rect.top < middle_y && rect.top + rect.height > middle_y {
                location += weights.centrality / 2.0;
            }

            let size = rect.area() / viewport.area() * weights.size;
            RectangleScore {
                location,
                size,
                total: location + size,
            }
        })
        .collect()
}

/// Sum of the rectangle scores of one resource.
pub fn score_resource(
    viewport: ViewportSize,
    rectangles: &[Rectangle],
    weights: &ScoringWeights,
) -> RectangleScore {
    score_rectangles(viewport, rectangles, weights)
        .into_iter()
        .sum()
}
