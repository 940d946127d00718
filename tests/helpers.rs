// Shared test helpers for building crawler cache directories.
//
// Each fixture lives in its own temporary directory laid out the way the crawler
// writes it, so integration tests exercise the real loading path.

use std::path::Path;

use image::{Rgba, RgbaImage};
use serde_json::{json, Value};
use tempfile::TempDir;

use memento_damage::cache::CachePaths;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A cache directory holding the artifacts of one memento.
pub struct CacheFixture {
    pub dir: TempDir,
    pub uri: String,
    pub paths: CachePaths,
}

#[allow(dead_code)] // Not every test file uses every helper
impl CacheFixture {
    /// Creates an empty cache for `uri` with its `log/`, `html/` and screenshot directories.
    pub fn new(uri: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self::in_dir(dir, uri)
    }

    /// Creates the fixture inside an existing directory, for several mementos sharing one cache.
    pub fn in_dir(dir: TempDir, uri: &str) -> Self {
        let paths = CachePaths::new(dir.path(), uri);
        for sub in ["html", "log", "screenshot"] {
            std::fs::create_dir_all(dir.path().join(sub)).expect("Failed to create cache dir");
        }
        std::fs::create_dir_all(&paths.screenshot_dir).expect("Failed to create screenshot dir");
        CacheFixture {
            dir,
            uri: uri.to_string(),
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_html(&self, html: &str) -> &Self {
        std::fs::write(&self.paths.html, html).expect("Failed to write html");
        self
    }

    pub fn write_network_log(&self, records: &[Value]) -> &Self {
        write_jsonl(&self.paths.log, records);
        self
    }

    pub fn write_image_log(&self, records: &[Value]) -> &Self {
        write_jsonl(&self.paths.image_log, records);
        self
    }

    pub fn write_css_log(&self, records: &[Value]) -> &Self {
        write_jsonl(&self.paths.css_log, records);
        self
    }

    pub fn write_multimedia_log(&self, records: &[Value]) -> &Self {
        write_jsonl(&self.paths.multimedia_log, records);
        self
    }

    pub fn write_crawl_log(&self, text: &str) -> &Self {
        std::fs::write(&self.paths.crawl_log, text).expect("Failed to write crawl log");
        self
    }

    pub fn write_stylesheet_screenshot(&self, hash: &str, image: &RgbaImage) -> &Self {
        image
            .save(self.paths.screenshot_dir.join(format!("{}.png", hash)))
            .expect("Failed to write stylesheet screenshot");
        self
    }

    pub fn write_page_screenshot(&self, image: &RgbaImage) -> &Self {
        image
            .save(&self.paths.page_screenshot)
            .expect("Failed to write page screenshot");
        self
    }
}

fn write_jsonl(path: &Path, records: &[Value]) {
    let body: String = records.iter().map(|record| format!("{}\n", record)).collect();
    std::fs::write(path, body).expect("Failed to write log");
}

/// A generic log record.
#[allow(dead_code)]
pub fn exchange(url: &str, status: u16) -> Value {
    json!({ "url": url, "status_code": status, "headers": {} })
}

/// A 302 record pointing at `location`.
#[allow(dead_code)]
pub fn redirect(url: &str, location: &str) -> Value {
    json!({ "url": url, "status_code": 302, "headers": { "Location": location } })
}

/// An image or multimedia record laid out once in a 1024x768 viewport.
#[allow(dead_code)]
pub fn laid_out(url: &str, status: u16, rect: [f64; 4]) -> Value {
    json!({
        "url": url,
        "status_code": status,
        "headers": {},
        "viewport_size": [1024, 768],
        "rectangles": [{ "left": rect[0], "top": rect[1], "width": rect[2], "height": rect[3] }],
    })
}

/// A stylesheet record.
#[allow(dead_code)]
pub fn stylesheet(url: &str, importance: f64, hash: &str) -> Value {
    json!({ "url": url, "importance": importance, "hash": hash })
}

/// A screenshot of a single colour.
#[allow(dead_code)]
pub fn uniform(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// A white screenshot whose left third is black, so background sits in the center and right.
#[allow(dead_code)]
pub fn left_third_black(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| if x < width / 3 { BLACK } else { WHITE })
}
