//! Crawler cache directory layout and loading.
//!
//! The crawler writes everything it captured for a memento under names derived from
//! the hex MD5 of the memento URI:
//!
//! ```text
//! <cache>/html/<md5>.html          page source
//! <cache>/log/<md5>.log            every HTTP exchange (required)
//! <cache>/log/<md5>.img.log        image layout
//! <cache>/log/<md5>.css.log        stylesheet importance
//! <cache>/log/<md5>.vid.log        multimedia layout
//! <cache>/log/<md5>.crawl.log      crawler progress, including the background colour
//! <cache>/screenshot/<md5>.png     the page
//! <cache>/screenshot/<md5>/<h>.png the page rendered per stylesheet
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::config::BackgroundColor;
use crate::damage::DamageInputs;
use crate::error_handling::RecordIssue;
use crate::logs::{parse_log_lines, FromRawLog, Ingested, LogKind};
use crate::text::extract_text;
use crate::utils::hash_uri;

/// Locations of every cached artifact of one memento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePaths {
    pub html: PathBuf,
    pub log: PathBuf,
    pub image_log: PathBuf,
    pub css_log: PathBuf,
    pub multimedia_log: PathBuf,
    pub crawl_log: PathBuf,
    pub page_screenshot: PathBuf,
    pub screenshot_dir: PathBuf,
}

impl CachePaths {
    pub fn new(cache_dir: &Path, uri: &str) -> Self {
        let hashed = hash_uri(uri);
        let log_dir = cache_dir.join("log");
        let screenshot_dir = cache_dir.join("screenshot");

        CachePaths {
            html: cache_dir.join("html").join(format!("{}.html", hashed)),
            log: log_dir.join(format!("{}.log", hashed)),
            image_log: log_dir.join(format!("{}.img.log", hashed)),
            css_log: log_dir.join(format!("{}.css.log", hashed)),
            multimedia_log: log_dir.join(format!("{}.vid.log", hashed)),
            crawl_log: log_dir.join(format!("{}.crawl.log", hashed)),
            page_screenshot: screenshot_dir.join(format!("{}.png", hashed)),
            screenshot_dir: screenshot_dir.join(hashed),
        }
    }
}

/// A memento read back from the cache, ready for the engine.
#[derive(Debug, Clone)]
pub struct LoadedMemento {
    pub inputs: DamageInputs,
    /// Background colour the crawler detected, if it reported one
    pub background_hint: Option<BackgroundColor>,
}

/// Reads every cached artifact of `uri`.
///
/// Malformed log lines do not fail the load; they are carried in
/// `inputs.issues` and reported with the result.
///
/// # Arguments
///
/// * `cache_dir` - Root of the crawler cache
/// * `uri` - Memento URI, hashed to locate its files
///
/// # Errors
///
/// Returns an error if the generic log is missing or any present file cannot be read.
pub fn load_memento(cache_dir: &Path, uri: &str) -> Result<LoadedMemento> {
    let paths = CachePaths::new(cache_dir, uri);
    log::debug!("Loading {} from {}", uri, paths.log.display());

    let log_text = std::fs::read_to_string(&paths.log)
        .with_context(|| format!("Failed to read network log {}", paths.log.display()))?;
    let html = read_optional(&paths.html)?;
    let image_text = read_optional(&paths.image_log)?;
    let css_text = read_optional(&paths.css_log)?;
    let multimedia_text = read_optional(&paths.multimedia_log)?;

    let mut issues = Vec::new();
    let logs = ingest(LogKind::Generic, &log_text, &mut issues);
    let images = ingest(LogKind::Image, &image_text, &mut issues);
    let stylesheets = ingest(LogKind::Stylesheet, &css_text, &mut issues);
    let multimedia = ingest(LogKind::Multimedia, &multimedia_text, &mut issues);
    if !issues.is_empty() {
        log::warn!("{} malformed log records for {}", issues.len(), uri);
    }

    let background_hint = match std::fs::read_to_string(&paths.crawl_log) {
        Ok(text) => background_hint(&text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read crawler log {}", paths.crawl_log.display())
            })
        }
    };

    let page_screenshot = paths
        .page_screenshot
        .is_file()
        .then(|| paths.page_screenshot.clone());

    Ok(LoadedMemento {
        inputs: DamageInputs {
            uri: uri.to_string(),
            text: extract_text(&html),
            logs,
            images,
            stylesheets,
            multimedia,
            screenshot_dir: paths.screenshot_dir,
            page_screenshot,
            issues,
        },
        background_hint,
    })
}

fn ingest<T: FromRawLog>(kind: LogKind, text: &str, issues: &mut Vec<RecordIssue>) -> Vec<T> {
    let Ingested { records, issues: found } = parse_log_lines(kind, text);
    issues.extend(found);
    records
}

/// Reads a file that the crawler may not have produced. Absent files read as empty.
fn read_optional(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("{} not found, treating it as empty", path.display());
            Ok(String::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Last valid `background_color` reported in a crawler log.
///
/// The crawler log mixes JSON records with free-form progress lines; only JSON
/// objects carrying a non-empty `background_color` string are considered.
pub fn background_hint(crawl_log: &str) -> Option<BackgroundColor> {
    let mut hint = None;
    for line in crawl_log.lines() {
        let line = line.trim();
        if !line.contains("background_color") {
            continue;
        }
        let Ok(Value::Object(record)) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let Some(Value::String(color)) = record.get("background_color") else {
            continue;
        };
        if color.is_empty() {
            continue;
        }
        match color.parse::<BackgroundColor>() {
            Ok(parsed) => hint = Some(parsed),
            Err(e) => log::warn!("Ignoring crawler background colour: {}", e),
        }
    }
    hint
}
