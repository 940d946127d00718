//! Log record types.

use std::collections::BTreeMap;

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use strum_macros::Display;

use crate::config::{MISSING_STATUS_THRESHOLD, STYLESHEET_ALWAYS_CONSIDERED_MISSING};
use crate::damage::{GeometricBreakdown, StylesheetBreakdown};

/// Which crawler log a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogKind {
    Generic,
    Image,
    Multimedia,
    Stylesheet,
}

/// One on-page occurrence of a resource, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rectangle {
            left,
            top,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Browser viewport the rectangles were laid out in.
///
/// A zero-area viewport is representable; everything computed against it is 0.
/// Serialized as `[width, height]`, the way the crawler writes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const ZERO: ViewportSize = ViewportSize {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        ViewportSize { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether anything can be measured against this viewport.
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.area().is_finite()
    }
}

impl Serialize for ViewportSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.width)?;
        tuple.serialize_element(&self.height)?;
        tuple.end()
    }
}

/// Fields shared by every record the filter and redirect resolver work on.
pub trait Resource {
    fn url(&self) -> &str;
    fn status_code(&self) -> Option<u16>;
    fn headers(&self) -> &BTreeMap<String, String>;

    /// Moves the record onto the final URL of its redirect chain.
    fn redirect_to(&mut self, url: String, status_code: Option<u16>);
}

/// A plain HTTP exchange from the generic log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericLog {
    pub url: String,
    pub status_code: Option<u16>,
    pub headers: BTreeMap<String, String>,
}

impl GenericLog {
    pub fn new(url: impl Into<String>, status_code: Option<u16>) -> Self {
        GenericLog {
            url: url.into(),
            status_code,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

impl Resource for GenericLog {
    fn url(&self) -> &str {
        &self.url
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn redirect_to(&mut self, url: String, status_code: Option<u16>) {
        self.url = url;
        self.status_code = status_code;
    }
}

/// A laid-out image or multimedia element.
///
/// `percentage_coverage` and the damage breakdowns are filled in by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageLog {
    pub url: String,
    pub status_code: Option<u16>,
    pub headers: BTreeMap<String, String>,
    pub viewport_size: ViewportSize,
    pub rectangles: Vec<Rectangle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_coverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_damage: Option<GeometricBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_damage: Option<GeometricBreakdown>,
}

impl ImageLog {
    pub fn new(
        url: impl Into<String>,
        status_code: Option<u16>,
        viewport_size: ViewportSize,
        rectangles: Vec<Rectangle>,
    ) -> Self {
        ImageLog {
            url: url.into(),
            status_code,
            headers: BTreeMap::new(),
            viewport_size,
            rectangles,
            percentage_coverage: None,
            potential_damage: None,
            actual_damage: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether the resource failed to load (status above 399). Unknown status is not a failure.
    pub fn is_missing(&self) -> bool {
        self.status_code
            .is_some_and(|status| status > MISSING_STATUS_THRESHOLD)
    }
}

impl Resource for ImageLog {
    fn url(&self) -> &str {
        &self.url
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn redirect_to(&mut self, url: String, status_code: Option<u16>) {
        self.url = url;
        self.status_code = status_code;
    }
}

/// A stylesheet applied to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StylesheetLog {
    pub url: String,
    pub status_code: Option<u16>,
    pub headers: BTreeMap<String, String>,
    /// Score of the rules that matched visible elements; 0 when none did
    pub importance: f64,
    /// Content hash naming the screenshot taken with this stylesheet
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_damage: Option<StylesheetBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_damage: Option<StylesheetBreakdown>,
}

impl StylesheetLog {
    pub fn new(url: impl Into<String>, importance: f64, hash: impl Into<String>) -> Self {
        StylesheetLog {
            url: url.into(),
            status_code: None,
            headers: BTreeMap::new(),
            importance,
            hash: hash.into(),
            potential_damage: None,
            actual_damage: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether the stylesheet counts towards actual damage.
    ///
    /// Stylesheet screenshots are always measured, whatever the logged status.
    pub fn is_missing(&self) -> bool {
        STYLESHEET_ALWAYS_CONSIDERED_MISSING
            || self
                .status_code
                .is_some_and(|status| status > MISSING_STATUS_THRESHOLD)
    }
}

impl Resource for StylesheetLog {
    fn url(&self) -> &str {
        &self.url
    }

    fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn redirect_to(&mut self, url: String, status_code: Option<u16>) {
        self.url = url;
        self.status_code = status_code;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_measurable() {
        assert!(ViewportSize::new(1024.0, 768.0).is_measurable());
        assert!(!ViewportSize::ZERO.is_measurable());
        assert!(!ViewportSize::new(1024.0, 0.0).is_measurable());
    }

    #[test]
    fn test_viewport_serializes_as_pair() {
        let value = serde_json::to_value(ViewportSize::new(800.0, 600.0)).unwrap();
        assert_eq!(value, serde_json::json!([800.0, 600.0]));
    }

    #[test]
    fn test_image_is_missing() {
        let viewport = ViewportSize::new(10.0, 10.0);
        assert!(ImageLog::new("a", Some(404), viewport, vec![]).is_missing());
        assert!(ImageLog::new("a", Some(500), viewport, vec![]).is_missing());
        assert!(!ImageLog::new("a", Some(399), viewport, vec![]).is_missing());
        assert!(!ImageLog::new("a", Some(200), viewport, vec![]).is_missing());
        assert!(!ImageLog::new("a", None, viewport, vec![]).is_missing());
    }

    #[test]
    fn test_stylesheet_always_missing() {
        let mut css = StylesheetLog::new("http://a/s.css", 1.0, "abc");
        assert!(css.is_missing());
        css.status_code = Some(200);
        assert!(css.is_missing());
    }

    #[test]
    fn test_log_kind_display() {
        assert_eq!(LogKind::Stylesheet.to_string(), "stylesheet");
        assert_eq!(LogKind::Multimedia.to_string(), "multimedia");
    }

    #[test]
    fn test_redirect_to_rewrites_url_and_status() {
        let mut log = StylesheetLog::new("http://a/old.css", 1.0, "h");
        log.redirect_to("http://a/new.css".to_string(), Some(200));
        assert_eq!(log.url(), "http://a/new.css");
        assert_eq!(log.status_code(), Some(200));
    }
}
