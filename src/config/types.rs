//! Configuration types and CLI options.
//!
//! This module defines the per-computation configuration handed to the engine and the
//! enums and structs used for command-line argument parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::config::constants::{
    BLACKLISTED_URIS, DEFAULT_BACKGROUND_COLOR, DEFAULT_CENTRALITY_WEIGHT, DEFAULT_RATIO_WEIGHT,
    DEFAULT_SIZE_WEIGHT, DEFAULT_TAG_WEIGHT, DEFAULT_WINDOW_SIZE, SEMAPHORE_LIMIT,
};
use crate::error_handling::DamageError;

const HEX_COLOR_PATTERN: &str = r"^#?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})$";

static HEX_COLOR: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(HEX_COLOR_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        log::error!("Failed to compile colour pattern '{}': {}", HEX_COLOR_PATTERN, e);
        None
    }
});

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Page background colour, compared against screenshot pixels by RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor([u8; 3]);

impl BackgroundColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }

    /// Upper-case six digit hex form, e.g. `FFFFFF`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::new(0xFF, 0xFF, 0xFF)
    }
}

impl FromStr for BackgroundColor {
    type Err = DamageError;

    /// Parses `RRGGBB` or `#RRGGBB`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DamageError::InvalidBackgroundColor(s.to_string());
        let re = HEX_COLOR.as_ref().ok_or_else(invalid)?;
        let caps = re.captures(s.trim()).ok_or_else(invalid)?;

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            let digits = caps.get(i + 1).ok_or_else(invalid)?.as_str();
            *channel = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
        }
        Ok(Self(rgb))
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for BackgroundColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Weights of the per-resource scorers.
///
/// The channel weights are constants of the model; these only split the score of a
/// single resource between its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Share of an image/multimedia score driven by its area
    pub size: f64,
    /// Share of an image/multimedia score driven by crossing the viewport centre lines
    pub centrality: f64,
    /// Share of a stylesheet score driven by its rules affecting layout
    pub tag: f64,
    /// Share of a stylesheet score driven by the whitespace heuristic
    pub ratio: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE_WEIGHT,
            centrality: DEFAULT_CENTRALITY_WEIGHT,
            tag: DEFAULT_TAG_WEIGHT,
            ratio: DEFAULT_RATIO_WEIGHT,
        }
    }
}

/// Configuration for one damage computation.
///
/// Built by the caller and passed to the engine explicitly; nothing here is shared
/// mutable state.
///
/// # Examples
///
/// ```
/// use memento_damage::config::{BackgroundColor, DamageConfig};
///
/// let config = DamageConfig {
///     background_color: "F0F0F0".parse::<BackgroundColor>().unwrap(),
///     ..Default::default()
/// };
/// assert_eq!(config.window_size, (1024, 768));
/// ```
#[derive(Debug, Clone)]
pub struct DamageConfig {
    /// URL prefixes removed before scoring
    pub blacklisted_uris: Vec<String>,
    /// Colour treated as blank space in screenshots
    pub background_color: BackgroundColor,
    /// Per-resource scorer weights
    pub weights: ScoringWeights,
    /// Measure the fixed `window_size` instead of the screenshot's own size
    pub use_window_size: bool,
    /// Window measured when `use_window_size` is set
    pub window_size: (u32, u32),
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            blacklisted_uris: BLACKLISTED_URIS.iter().map(|s| s.to_string()).collect(),
            background_color: BackgroundColor::default(),
            weights: ScoringWeights::default(),
            use_window_size: false,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Score one memento from a crawler cache directory
/// memento_damage compute http://web.archive.org/web/2015/http://example.com/ --cache-dir ./cache
///
/// # Score every URI listed in a file, four at a time
/// memento_damage batch uris.txt --cache-dir ./cache --output results.jsonl
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "memento_damage",
    about = "Scores how much of an archived web page was lost during capture."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the damage of a single memento
    Compute(ComputeArgs),
    /// Compute the damage of every URI listed in a file
    Batch(BatchArgs),
}

/// Options of the `compute` subcommand.
#[derive(Debug, Args)]
pub struct ComputeArgs {
    /// URI of the memento
    pub uri: String,

    /// Crawler cache directory (contains html/, log/ and screenshot/)
    #[arg(long, value_parser)]
    pub cache_dir: PathBuf,

    /// Page background colour as RRGGBB (default: crawler hint, then FFFFFF)
    #[arg(long)]
    pub background_color: Option<String>,

    /// Measure the fixed 1024x768 window instead of each screenshot's size
    #[arg(long, default_value_t = false)]
    pub use_window_size: bool,

    /// Write the result to this file instead of stdout
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,
}

/// Options of the `batch` subcommand.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// File with one URI per line (`-` for stdin, `#` starts a comment)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Crawler cache directory (contains html/, log/ and screenshot/)
    #[arg(long, value_parser)]
    pub cache_dir: PathBuf,

    /// Background colour used when the crawler gave no hint
    #[arg(long, default_value = DEFAULT_BACKGROUND_COLOR)]
    pub background_color: String,

    /// Measure the fixed 1024x768 window instead of each screenshot's size
    #[arg(long, default_value_t = false)]
    pub use_window_size: bool,

    /// JSON Lines output file (stdout if omitted)
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,

    /// Maximum concurrent computations
    #[arg(long, default_value_t = SEMAPHORE_LIMIT)]
    pub max_concurrency: usize,

    /// Per-URI timeout in seconds
    #[arg(long, default_value_t = 600)]
    pub timeout_seconds: u64,
}
