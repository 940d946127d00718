//! Stylesheet damage: rule importance plus the whitespace ratio.

use std::path::{Path, PathBuf};

use crate::config::DamageConfig;
use crate::damage::{ScoringMode, StylesheetBreakdown};
use crate::error_handling::DamageError;
use crate::logs::StylesheetLog;

use super::whitespace::{load_screenshot, measure_whitespace, ratio_importance};

/// Directory of the screenshots taken per stylesheet, named `<hash>.png`.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ScreenshotStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the screenshot for `hash`.
    ///
    /// # Errors
    ///
    /// A hash that could name a file outside the directory is reported as
    /// `DamageError::AssetUnavailable`.
    pub fn path_for(&self, hash: &str) -> Result<PathBuf, DamageError> {
        if hash.is_empty() || hash.contains(['/', '\\']) || hash.contains("..") {
            return Err(DamageError::AssetUnavailable {
                path: self.dir.join(hash),
                reason: format!("'{}' is not a screenshot hash", hash),
            });
        }
        Ok(self.dir.join(format!("{}.png", hash)))
    }
}

/// Scores one stylesheet.
///
/// The tag importance is `weights.tag` when any of the stylesheet's rules matched
/// visible content. In potential mode the ratio importance is the full
/// `weights.ratio` and no file is read. In actual mode the screenshot for
/// `log.hash` is measured and converted with [`ratio_importance`].
///
/// # Errors
///
/// In actual mode, returns `DamageError::AssetUnavailable` when the screenshot is
/// missing or corrupt.
pub fn score_stylesheet(
    log: &StylesheetLog,
    config: &DamageConfig,
    mode: ScoringMode,
    screenshots: &ScreenshotStore,
) -> Result<StylesheetBreakdown, DamageError> {
    let weights = &config.weights;
    let tag = if log.importance > 0.0 { weights.tag } else { 0.0 };

    let ratio = match mode {
        ScoringMode::Potential => weights.ratio,
        ScoringMode::Actual => {
            let path = screenshots.path_for(&log.hash)?;
            let image = load_screenshot(&path)?;
            let window = if config.use_window_size {
                config.window_size
            } else {
                image.dimensions()
            };
            let profile = measure_whitespace(&image, window, config.background_color);
            log::debug!(
                "Whitespace for {} ({}): left {:.2}, center {:.2}, right {:.2}",
                log.url,
                path.display(),
                profile.left,
                profile.center,
                profile.right
            );
            ratio_importance(&profile, weights.ratio)
        }
    };

    Ok(StylesheetBreakdown {
        tag,
        ratio,
        total: tag + ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_potential_mode_never_reads_files() {
        let store = ScreenshotStore::new("/definitely/not/here");
        let config = DamageConfig::default();

        let unimportant = StylesheetLog::new("http://a/s.css", 0.0, "missing");
        let score = score_stylesheet(&unimportant, &config, ScoringMode::Potential, &store).unwrap();
        assert_eq!(score.tag, 0.0);
        assert_eq!(score.ratio, config.weights.ratio);
        assert_eq!(score.total, config.weights.ratio);

        let important = StylesheetLog::new("http://a/s.css", 2.5, "missing");
        let score = score_stylesheet(&important, &config, ScoringMode::Potential, &store).unwrap();
        assert_eq!(score.tag, config.weights.tag);
        assert_eq!(score.total, 1.0);
    }

    #[test]
    fn test_actual_mode_measures_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        // Blank right third on a black page
        let image = RgbaImage::from_fn(300, 100, |x, _| {
            if x >= 200 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        image.save(dir.path().join("abc.png")).unwrap();

        let store = ScreenshotStore::new(dir.path());
        let config = DamageConfig::default();
        let log = StylesheetLog::new("http://a/s.css", 1.0, "abc");
        let score = score_stylesheet(&log, &config, ScoringMode::Actual, &store).unwrap();
        assert_eq!(score.tag, 0.5);
        assert_eq!(score.ratio, 0.5);
        assert_eq!(score.total, 1.0);
    }

    #[test]
    fn test_actual_mode_with_fixed_window() {
        let dir = tempfile::tempdir().unwrap();
        // 300px wide blank screenshot measured in a 1024px window: only the left third matches
        RgbaImage::from_pixel(300, 100, Rgba([255, 255, 255, 255]))
            .save(dir.path().join("w.png"))
            .unwrap();

        let store = ScreenshotStore::new(dir.path());
        let config = DamageConfig {
            use_window_size: true,
            ..Default::default()
        };
        let log = StylesheetLog::new("http://a/s.css", 0.0, "w");
        let score = score_stylesheet(&log, &config, ScoringMode::Actual, &store).unwrap();
        assert_eq!(score.ratio, 0.5);
    }

    #[test]
    fn test_actual_mode_missing_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(dir.path());
        let log = StylesheetLog::new("http://a/s.css", 1.0, "absent");
        let err = score_stylesheet(&log, &DamageConfig::default(), ScoringMode::Actual, &store)
            .unwrap_err();
        assert!(matches!(err, DamageError::AssetUnavailable { .. }));
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = ScreenshotStore::new("/cache/screenshot/abc");
        assert_eq!(
            store.path_for("deadbeef").unwrap(),
            PathBuf::from("/cache/screenshot/abc/deadbeef.png")
        );
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("a/b").is_err());
    }
}
