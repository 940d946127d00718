//! Viewport coverage of laid-out resources.

use crate::logs::{ImageLog, Rectangle, ViewportSize};

/// Fraction of the viewport covered by `rectangles`.
///
/// Areas are summed without removing overlaps, so a resource shown several times can
/// exceed 1.0. A viewport with no area yields 0.
pub fn percentage_coverage(viewport: ViewportSize, rectangles: &[Rectangle]) -> f64 {
    if !viewport.is_measurable() {
        return 0.0;
    }
    let covered: f64 = rectangles.iter().map(Rectangle::area).sum();
    covered / viewport.area()
}

/// Stores the coverage of every record on the record itself.
pub fn apply_coverage(logs: &mut [ImageLog]) {
    for log in logs.iter_mut() {
        let coverage = percentage_coverage(log.viewport_size, &log.rectangles);
        log.percentage_coverage = Some(coverage);
    }
}
