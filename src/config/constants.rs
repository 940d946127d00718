//! Configuration constants.
//!
//! This module defines the fixed constants of the damage model: channel weights,
//! status thresholds, the default blacklist and the limits used by the batch runner.

use std::time::Duration;

// Channel weights. These are part of the model, not tunables.
/// Weight of the multimedia channel.
pub const MULTIMEDIA_WEIGHT: f64 = 0.50;
/// Weight of the stylesheet channel.
pub const CSS_WEIGHT: f64 = 0.05;
/// Share of the remaining weight given to images.
pub const IMAGE_PROPORTION: f64 = 3.0 / 4.0;
/// Weight of the image channel: `0.75 * (1 - (0.50 + 0.05)) = 0.3375`.
pub const IMAGE_WEIGHT: f64 = IMAGE_PROPORTION * (1.0 - (MULTIMEDIA_WEIGHT + CSS_WEIGHT));
/// Weight of the text channel: whatever is left, `0.1125`.
pub const TEXT_WEIGHT: f64 = 1.0 - (MULTIMEDIA_WEIGHT + CSS_WEIGHT + IMAGE_WEIGHT);

/// Number of words of extracted text counted as one unit of potential damage.
pub const WORDS_PER_IMAGE: usize = 1000;

// Per-resource scorer defaults
pub const DEFAULT_SIZE_WEIGHT: f64 = 0.5;
pub const DEFAULT_CENTRALITY_WEIGHT: f64 = 0.5;
pub const DEFAULT_TAG_WEIGHT: f64 = 0.5;
pub const DEFAULT_RATIO_WEIGHT: f64 = 0.5;

/// Fixed window used by the raster scorer when it does not use the screenshot's own size.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1024, 768);

/// Background colour assumed when the crawler did not report one.
pub const DEFAULT_BACKGROUND_COLOR: &str = "FFFFFF";

// HTTP status handling
/// The only status the redirect resolver follows.
pub const REDIRECT_STATUS: u16 = 302;
/// Resources with a status strictly above this are missing.
pub const MISSING_STATUS_THRESHOLD: u16 = 399;
/// Status the top-level page must have for the damage ratio to be computed.
pub const PAGE_OK_STATUS: u16 = 200;

/// Stylesheet logs are scored as missing whatever their recorded status.
///
/// The crawler cannot tell whether a stylesheet was served from the archive, so the
/// actual pass counts every stylesheet.
pub const STYLESHEET_ALWAYS_CONSIDERED_MISSING: bool = true;

/// URL prefixes of out-of-band resources (analytics beacons injected by the archive).
pub const BLACKLISTED_URIS: &[&str] = &["https://analytics.archive.org/"];

/// `Link` header value marking a resource that must not be content-negotiated.
pub const DONOTNEGOTIATE_LINK: &str = "<http://mementoweb.org/terms/donotnegotiate>; rel=\"type\"";

// Batch runner
/// Maximum concurrent computations
pub const SEMAPHORE_LIMIT: usize = 4;
/// Log progress every N completed URIs
pub const LOGGING_INTERVAL: usize = 5;
/// Wall-clock bound for one computation in the batch runner (10 minutes)
pub const COMPUTATION_TIMEOUT: Duration = Duration::from_secs(10 * 60);

// Error message size limit
/// Maximum error message length in characters
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_weights_sum_to_one() {
        let sum = MULTIMEDIA_WEIGHT + CSS_WEIGHT + IMAGE_WEIGHT + TEXT_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9, "weights sum to {}", sum);
    }

    #[test]
    fn test_derived_weights() {
        assert!((IMAGE_WEIGHT - 0.3375).abs() < 1e-12);
        assert!((TEXT_WEIGHT - 0.1125).abs() < 1e-12);
    }

    #[test]
    fn test_stylesheets_always_missing() {
        assert!(STYLESHEET_ALWAYS_CONSIDERED_MISSING);
    }
}
