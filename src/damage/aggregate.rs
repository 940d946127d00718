//! Channel weighting and the overall damage ratio.

use serde::Serialize;

use crate::config::{
    CSS_WEIGHT, IMAGE_WEIGHT, MULTIMEDIA_WEIGHT, PAGE_OK_STATUS, TEXT_WEIGHT, WORDS_PER_IMAGE,
};
use crate::text::word_count;

/// The four channel weights. Fixed by the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelWeights {
    pub multimedia: f64,
    pub css: f64,
    pub image: f64,
    pub text: f64,
}

impl ChannelWeights {
    pub const FIXED: ChannelWeights = ChannelWeights {
        multimedia: MULTIMEDIA_WEIGHT,
        css: CSS_WEIGHT,
        image: IMAGE_WEIGHT,
        text: TEXT_WEIGHT,
    };

    pub fn sum(&self) -> f64 {
        self.multimedia + self.css + self.image + self.text
    }
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Unweighted damage per channel for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelTotals {
    pub image: f64,
    pub css: f64,
    pub multimedia: f64,
    pub text: f64,
}

/// Weighted damage of one pass, overall and per channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DamageSummary {
    pub total: f64,
    pub image: f64,
    pub css: f64,
    pub multimedia: f64,
    pub text: f64,
}

/// Word count of the page text, reported with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub num_words: usize,
    pub words_per_image: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        TextStats {
            num_words: word_count(text),
            words_per_image: WORDS_PER_IMAGE,
        }
    }
}

/// Potential text damage: one unit per `WORDS_PER_IMAGE` words.
pub fn text_damage(num_words: usize) -> f64 {
    num_words as f64 / WORDS_PER_IMAGE as f64
}

/// Applies channel weights to the totals of one pass.
pub fn aggregate(totals: &ChannelTotals, weights: &ChannelWeights) -> DamageSummary {
    let image = totals.image * weights.image;
    let css = totals.css * weights.css;
    let multimedia = totals.multimedia * weights.multimedia;
    let text = totals.text * weights.text;

    DamageSummary {
        total: image + css + multimedia + text,
        image,
        css,
        multimedia,
        text,
    }
}

/// Overall damage of a memento.
///
/// A page that was not itself served with 200 (or was never logged) is a total loss.
/// Otherwise the ratio is `actual / potential`, or 0 when nothing could be lost.
pub fn total_damage_ratio(page_status: Option<u16>, potential: f64, actual: f64) -> f64 {
    if page_status != Some(PAGE_OK_STATUS) {
        1.0
    } else if potential != 0.0 {
        actual / potential
    } else {
        0.0
    }
}
