//! Raster whitespace analysis of screenshots.
//!
//! Stylesheets have no rectangle to measure, so their damage is inferred from the
//! screenshot taken with them: a page whose stylesheet is missing tends to collapse
//! into one left-aligned column, leaving the right of the window blank. Pixels that
//! match the page background ("whiteguys") are counted per column and bucketed into
//! left, center and right thirds.

mod stylesheet;
mod whitespace;

pub use stylesheet::{score_stylesheet, ScreenshotStore};
pub use whitespace::{load_screenshot, measure_whitespace, ratio_importance, WhitespaceProfile};
