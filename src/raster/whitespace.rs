//! Background-colour column counts and the ratio importance derived from them.

use std::path::Path;

use image::RgbaImage;
use serde::Serialize;

use crate::config::BackgroundColor;
use crate::error_handling::DamageError;

/// Average number of background pixels per column, for each third of the window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WhitespaceProfile {
    /// Measured window width
    pub width: u32,
    /// Measured window height
    pub height: u32,
    pub left: f64,
    pub center: f64,
    pub right: f64,
}

impl WhitespaceProfile {
    pub fn sum(&self) -> f64 {
        self.left + self.center + self.right
    }

    /// Share of the right third in the three averages, `None` when there is no background at all.
    pub fn right_share(&self) -> Option<f64> {
        let sum = self.sum();
        if sum == 0.0 {
            None
        } else {
            Some(self.right / sum)
        }
    }
}

/// Opens a screenshot and converts it to RGBA.
///
/// The file handle is closed before this returns.
///
/// # Errors
///
/// Returns `DamageError::AssetUnavailable` when the file is missing or cannot be decoded.
pub fn load_screenshot(path: &Path) -> Result<RgbaImage, DamageError> {
    let image = image::open(path).map_err(|e| DamageError::AssetUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

/// Counts background pixels per column over a `window` of the screenshot.
///
/// Pixels of the window that fall outside the image never match. The window is split
/// at `floor(width / 3)` and `2 * floor(width / 3)`; the right third takes the leftover
/// columns, and each third is averaged over its own column count. A window narrower
/// than three columns has no thirds and yields an all-zero profile.
///
/// # Arguments
///
/// * `image` - Decoded screenshot
/// * `window` - `(width, height)` to measure, starting at the top-left corner
/// * `background` - Colour counted as blank (alpha is ignored)
pub fn measure_whitespace(
    image: &RgbaImage,
    window: (u32, u32),
    background: BackgroundColor,
) -> WhitespaceProfile {
    let (window_w, window_h) = window;
    let mut profile = WhitespaceProfile {
        width: window_w,
        height: window_h,
        ..Default::default()
    };

    let one_third = window_w / 3;
    if one_third == 0 {
        log::debug!("Window {}x{} too narrow to split into thirds", window_w, window_h);
        return profile;
    }

    let (image_w, image_h) = image.dimensions();
    let rows = window_h.min(image_h);
    let target = background.rgb();

    let column_counts: Vec<u64> = (0..window_w)
        .map(|x| {
            if x >= image_w {
                return 0;
            }
            (0..rows)
                .filter(|&y| {
                    let pixel = image.get_pixel(x, y);
                    pixel[0] == target[0] && pixel[1] == target[1] && pixel[2] == target[2]
                })
                .count() as u64
        })
        .collect();

    let bucket_average = |start: u32, end: u32| -> f64 {
        let total: u64 = column_counts[start as usize..end as usize].iter().sum();
        total as f64 / (end - start) as f64
    };

    profile.left = bucket_average(0, one_third);
    profile.center = bucket_average(one_third, 2 * one_third);
    profile.right = bucket_average(2 * one_third, window_w);
    profile
}

/// Converts a whitespace profile into the stylesheet ratio importance.
///
/// No background at all scores 0. A right third holding more than a third of the
/// background scores its share of `ratio_weight`; anything else scores the full weight.
pub fn ratio_importance(profile: &WhitespaceProfile, ratio_weight: f64) -> f64 {
    match profile.right_share() {
        None => 0.0,
        Some(share) if share > 1.0 / 3.0 => share * ratio_weight,
        Some(_) => ratio_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Image whose columns `from..` are white and the rest black.
    fn white_from_column(width: u32, height: u32, from: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, _| if x >= from { WHITE } else { BLACK })
    }

    #[test]
    fn test_uniform_background_takes_full_weight() {
        let image = RgbaImage::from_pixel(1024, 768, WHITE);
        let profile = measure_whitespace(&image, (1024, 768), BackgroundColor::default());
        assert_eq!(profile.left, 768.0);
        assert_eq!(profile.center, 768.0);
        assert_eq!(profile.right, 768.0);
        assert_eq!(ratio_importance(&profile, 0.5), 0.5);
    }

    #[test]
    fn test_no_background_scores_zero() {
        let image = RgbaImage::from_pixel(300, 200, BLACK);
        let profile = measure_whitespace(&image, (300, 200), BackgroundColor::default());
        assert_eq!(profile.sum(), 0.0);
        assert_eq!(profile.right_share(), None);
        assert_eq!(ratio_importance(&profile, 0.5), 0.0);
    }

    #[test]
    fn test_right_heavy_background_scales_by_share() {
        // Only the right third is blank
        let image = white_from_column(300, 100, 200);
        let profile = measure_whitespace(&image, (300, 100), BackgroundColor::default());
        assert_eq!(profile.left, 0.0);
        assert_eq!(profile.center, 0.0);
        assert_eq!(profile.right, 100.0);
        assert_eq!(ratio_importance(&profile, 0.5), 0.5);

        // Center and right blank: right share is exactly one half
        let image = white_from_column(300, 100, 100);
        let profile = measure_whitespace(&image, (300, 100), BackgroundColor::default());
        assert_eq!(profile.right_share(), Some(0.5));
        assert_eq!(ratio_importance(&profile, 0.5), 0.25);
    }

    #[test]
    fn test_left_heavy_background_takes_full_weight() {
        let image = RgbaImage::from_fn(300, 100, |x, _| if x < 100 { WHITE } else { BLACK });
        let profile = measure_whitespace(&image, (300, 100), BackgroundColor::default());
        assert_eq!(profile.left, 100.0);
        assert_eq!(ratio_importance(&profile, 0.5), 0.5);
    }

    #[test]
    fn test_right_bucket_averaged_over_its_own_columns() {
        // 10 columns: thirds of 3, 3 and 4 columns
        let image = RgbaImage::from_pixel(10, 6, WHITE);
        let profile = measure_whitespace(&image, (10, 6), BackgroundColor::default());
        assert_eq!(profile.left, 6.0);
        assert_eq!(profile.center, 6.0);
        assert_eq!(profile.right, 6.0);
    }

    #[test]
    fn test_alpha_ignored_and_colour_matched_exactly() {
        let image = RgbaImage::from_fn(9, 3, |x, _| match x {
            0..=2 => Rgba([0xF0, 0xF0, 0xF0, 0]),
            3..=5 => Rgba([0xF0, 0xF0, 0xF1, 255]),
            _ => Rgba([0xF0, 0xF0, 0xF0, 128]),
        });
        let grey: BackgroundColor = "F0F0F0".parse().unwrap();
        let profile = measure_whitespace(&image, (9, 3), grey);
        assert_eq!(profile.left, 3.0);
        assert_eq!(profile.center, 0.0);
        assert_eq!(profile.right, 3.0);
    }

    #[test]
    fn test_window_larger_than_image() {
        // Image covers only the left third of the window
        let image = RgbaImage::from_pixel(100, 50, WHITE);
        let profile = measure_whitespace(&image, (300, 100), BackgroundColor::default());
        assert_eq!(profile.left, 50.0);
        assert_eq!(profile.center, 0.0);
        assert_eq!(profile.right, 0.0);
        assert_eq!(ratio_importance(&profile, 0.5), 0.5);
    }

    #[test]
    fn test_too_narrow_window() {
        let image = RgbaImage::from_pixel(2, 10, WHITE);
        let profile = measure_whitespace(&image, (2, 10), BackgroundColor::default());
        assert_eq!(profile.sum(), 0.0);
        assert_eq!(ratio_importance(&profile, 0.5), 0.0);
    }

    #[test]
    fn test_load_missing_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_screenshot(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, DamageError::AssetUnavailable { .. }));
    }

    #[test]
    fn test_load_corrupt_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_screenshot(&path).unwrap_err();
        assert!(matches!(err, DamageError::AssetUnavailable { .. }));
    }
}
