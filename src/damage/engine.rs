//! Runs the full damage pipeline for one memento.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::DamageConfig;
use crate::coverage::apply_coverage;
use crate::error_handling::RecordIssue;
use crate::filter::filter_blacklisted;
use crate::geometry::score_resource;
use crate::logs::{GenericLog, ImageLog, LogKind, StylesheetLog};
use crate::raster::{
    load_screenshot, measure_whitespace, score_stylesheet, ScreenshotStore, WhitespaceProfile,
};
use crate::redirect::{resolve_redirects, RedirectUniverse};

use super::aggregate::{
    aggregate, text_damage, total_damage_ratio, ChannelTotals, ChannelWeights, DamageSummary,
    TextStats,
};
use super::types::{GeometricBreakdown, ScoringMode};

/// Everything the engine needs for one memento, already parsed.
#[derive(Debug, Clone, Default)]
pub struct DamageInputs {
    /// URI of the memento; its own record in `logs` decides whether the page loaded
    pub uri: String,
    /// Visible text of the page
    pub text: String,
    /// Every logged exchange, used for redirect resolution
    pub logs: Vec<GenericLog>,
    pub images: Vec<ImageLog>,
    pub stylesheets: Vec<StylesheetLog>,
    pub multimedia: Vec<ImageLog>,
    /// Directory holding one `<hash>.png` per stylesheet
    pub screenshot_dir: PathBuf,
    /// Screenshot of the whole page, measured for the report only
    pub page_screenshot: Option<PathBuf>,
    /// Records already rejected while reading the logs
    pub issues: Vec<RecordIssue>,
}

/// Counts of records the pipeline removed or rewrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Diagnostics {
    pub blacklisted: usize,
    pub redirects_collapsed: usize,
    pub redirect_loops: usize,
}

/// The scored memento.
#[derive(Debug, Clone, Serialize)]
pub struct DamageReport {
    pub uri: String,
    pub weight: ChannelWeights,
    pub images: Vec<ImageLog>,
    pub csses: Vec<StylesheetLog>,
    pub multimedias: Vec<ImageLog>,
    pub text: TextStats,
    pub potential_damage: DamageSummary,
    pub actual_damage: DamageSummary,
    pub total_damage: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RecordIssue>,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_whitespace: Option<WhitespaceProfile>,
}

/// Computes damage reports with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct DamageEngine {
    config: DamageConfig,
}

impl DamageEngine {
    pub fn new(config: DamageConfig) -> Self {
        DamageEngine { config }
    }

    pub fn config(&self) -> &DamageConfig {
        &self.config
    }

    /// Scores one memento.
    ///
    /// Records that cannot be scored (a stylesheet whose screenshot is missing, say)
    /// are left without a breakdown and reported in `errors`; the rest of the page is
    /// still scored.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Parsed logs, page text and screenshot locations
    ///
    /// # Returns
    ///
    /// The report with every surviving record annotated.
    pub fn compute(&self, inputs: DamageInputs) -> DamageReport {
        let DamageInputs {
            uri,
            text,
            logs,
            images,
            stylesheets,
            multimedia,
            screenshot_dir,
            page_screenshot,
            issues,
        } = inputs;
        let mut errors = issues;
        let mut diagnostics = Diagnostics::default();

        // Multimedia is not subject to the blacklist.
        let (images, removed_images) = filter_blacklisted(images, &self.config.blacklisted_uris);
        let (stylesheets, removed_css) =
            filter_blacklisted(stylesheets, &self.config.blacklisted_uris);
        diagnostics.blacklisted = removed_images + removed_css;

        let universe = RedirectUniverse::new(&logs);
        let resolved_images = resolve_redirects(images, &universe);
        let resolved_multimedia = resolve_redirects(multimedia, &universe);
        let resolved_css = resolve_redirects(stylesheets, &universe);
        diagnostics.redirects_collapsed = resolved_images.collapsed
            + resolved_multimedia.collapsed
            + resolved_css.collapsed;
        diagnostics.redirect_loops =
            resolved_images.loops + resolved_multimedia.loops + resolved_css.loops;

        let mut images = resolved_images.records;
        let mut multimedia = resolved_multimedia.records;
        let mut stylesheets = resolved_css.records;
        apply_coverage(&mut images);
        apply_coverage(&mut multimedia);

        let screenshots = ScreenshotStore::new(screenshot_dir);
        let text_stats = TextStats::from_text(&text);

        let mut potential = ChannelTotals {
            image: self.score_geometric(&mut images, ScoringMode::Potential),
            multimedia: self.score_geometric(&mut multimedia, ScoringMode::Potential),
            text: text_damage(text_stats.num_words),
            ..ChannelTotals::default()
        };
        potential.css = self.score_stylesheets(
            &mut stylesheets,
            ScoringMode::Potential,
            &screenshots,
            &mut errors,
        );

        // Text is never counted as lost.
        let mut actual = ChannelTotals {
            image: self.score_geometric(&mut images, ScoringMode::Actual),
            multimedia: self.score_geometric(&mut multimedia, ScoringMode::Actual),
            ..ChannelTotals::default()
        };
        actual.css = self.score_stylesheets(
            &mut stylesheets,
            ScoringMode::Actual,
            &screenshots,
            &mut errors,
        );

        let weights = ChannelWeights::FIXED;
        let potential_damage = aggregate(&potential, &weights);
        let actual_damage = aggregate(&actual, &weights);

        let page_status = universe.get(&uri).and_then(|log| log.status_code);
        if page_status.is_none() {
            log::warn!("No log record for {}, treating the page as lost", uri);
        }
        let total_damage =
            total_damage_ratio(page_status, potential_damage.total, actual_damage.total);

        let page_whitespace = page_screenshot.and_then(|path| match load_screenshot(&path) {
            Ok(image) => Some(measure_whitespace(
                &image,
                image.dimensions(),
                self.config.background_color,
            )),
            Err(e) => {
                log::warn!("Skipping page whitespace for {}: {}", uri, e);
                None
            }
        });

        log::info!(
            "Damage for {}: total {:.4} (potential {:.4}, actual {:.4})",
            uri,
            total_damage,
            potential_damage.total,
            actual_damage.total
        );

        DamageReport {
            uri,
            weight: weights,
            images,
            csses: stylesheets,
            multimedias: multimedia,
            text: text_stats,
            potential_damage,
            actual_damage,
            total_damage,
            errors,
            diagnostics,
            page_whitespace,
        }
    }

    /// Scores images or multimedia and returns the channel total.
    ///
    /// In actual mode only records that failed to load are scored.
    fn score_geometric(&self, logs: &mut [ImageLog], mode: ScoringMode) -> f64 {
        let mut total = 0.0;
        for log in logs.iter_mut() {
            if mode == ScoringMode::Actual && !log.is_missing() {
                continue;
            }
            let breakdown: GeometricBreakdown =
                score_resource(log.viewport_size, &log.rectangles, &self.config.weights).into();
            log::debug!("{} damage {:?} for {}", mode, breakdown, log.url);
            match mode {
                ScoringMode::Potential => log.potential_damage = Some(breakdown),
                ScoringMode::Actual => log.actual_damage = Some(breakdown),
            }
            total += breakdown.total;
        }
        total
    }

    /// Scores stylesheets and returns the channel total.
    ///
    /// A stylesheet that cannot be scored contributes nothing and is reported in `errors`.
    fn score_stylesheets(
        &self,
        logs: &mut [StylesheetLog],
        mode: ScoringMode,
        screenshots: &ScreenshotStore,
        errors: &mut Vec<RecordIssue>,
    ) -> f64 {
        let mut total = 0.0;
        for log in logs.iter_mut() {
            if mode == ScoringMode::Actual && !log.is_missing() {
                continue;
            }
            let breakdown = match score_stylesheet(log, &self.config, mode, screenshots) {
                Ok(breakdown) => breakdown,
                Err(e) => {
                    log::warn!("Could not score stylesheet {}: {}", log.url, e);
                    errors.push(RecordIssue::new(LogKind::Stylesheet, Some(&log.url), &e));
                    continue;
                }
            };
            log::debug!("{} damage {:?} for {}", mode, breakdown, log.url);
            match mode {
                ScoringMode::Potential => log.potential_damage = Some(breakdown),
                ScoringMode::Actual => log.actual_damage = Some(breakdown),
            }
            total += breakdown.total;
        }
        total
    }
}
