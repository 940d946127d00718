//! Single and batch computations over a crawler cache.
//!
//! [`compute_memento`] is the synchronous path used by the `compute` subcommand;
//! [`run_batch`] fans a list of URIs out over Tokio's blocking pool.

mod progress;
mod task;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::cache::load_memento;
use crate::config::{BackgroundColor, BatchArgs, DamageConfig, LOGGING_INTERVAL};
use crate::damage::{DamageEngine, DamageReport};
use crate::error_handling::ProcessingStats;
use crate::initialization::init_semaphore;

pub use progress::log_progress;
pub use task::{process_uri_task, BatchOutcome, UriTaskParams};

/// What to score and how.
#[derive(Debug, Clone)]
pub struct MementoRequest {
    pub uri: String,
    pub cache_dir: PathBuf,
    /// Colour forced by the caller, ahead of the crawler's hint
    pub background_override: Option<BackgroundColor>,
    /// Colour used when neither an override nor a hint exists
    pub background_fallback: BackgroundColor,
    pub use_window_size: bool,
}

impl MementoRequest {
    pub fn new(uri: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        MementoRequest {
            uri: uri.into(),
            cache_dir: cache_dir.into(),
            background_override: None,
            background_fallback: BackgroundColor::default(),
            use_window_size: false,
        }
    }
}

/// Loads a memento from the cache and scores it.
///
/// # Errors
///
/// Returns an error if the cache cannot be read (see [`load_memento`]).
pub fn compute_memento(request: &MementoRequest) -> Result<DamageReport> {
    let loaded = load_memento(&request.cache_dir, &request.uri)
        .with_context(|| format!("Failed to load {} from cache", request.uri))?;

    let background_color = request
        .background_override
        .or(loaded.background_hint)
        .unwrap_or(request.background_fallback);
    log::debug!("Background colour for {}: {}", request.uri, background_color);

    let config = DamageConfig {
        background_color,
        use_window_size: request.use_window_size,
        ..DamageConfig::default()
    };
    Ok(DamageEngine::new(config).compute(loaded.inputs))
}

/// Results of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of URIs read from the input
    pub total_uris: usize,
    /// URIs scored
    pub successful: usize,
    /// URIs that failed or timed out
    pub failed: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Scores every URI listed in `args.file`, writing one JSON line per URI.
///
/// Lines are written in completion order. A URI that fails produces
/// `{"uri": ..., "error": true, "message": ...}` and does not stop the batch.
///
/// # Errors
///
/// Returns an error if the background colour is invalid, or if the input cannot be
/// read or the output cannot be written.
pub async fn run_batch(args: &BatchArgs) -> Result<BatchReport> {
    let background_fallback = args
        .background_color
        .parse::<BackgroundColor>()
        .context("Invalid --background-color")?;

    let uris = read_uris(&args.file).await?;
    let total = uris.len();
    log::info!("Total URIs in input: {}", total);

    let mut output: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(tokio::io::stdout())),
    };

    let semaphore = init_semaphore(args.max_concurrency);
    let stats = Arc::new(ProcessingStats::new());
    let timeout = Duration::from_secs(args.timeout_seconds);
    let start_time = Instant::now();

    let mut tasks = FuturesUnordered::new();
    for uri in uris {
        let request = MementoRequest {
            background_fallback,
            use_window_size: args.use_window_size,
            ..MementoRequest::new(uri, args.cache_dir.clone())
        };
        tasks.push(tokio::spawn(process_uri_task(UriTaskParams {
            request,
            semaphore: Arc::clone(&semaphore),
            timeout,
            stats: Arc::clone(&stats),
        })));
    }

    let mut successful = 0;
    let mut failed = 0;
    while let Some(joined) = tasks.next().await {
        let outcome = joined.context("Batch task panicked")?;
        if outcome.error {
            failed += 1;
        } else {
            successful += 1;
        }

        let mut line = serde_json::to_vec(&outcome).context("Failed to serialize result")?;
        line.push(b'\n');
        output
            .write_all(&line)
            .await
            .context("Failed to write result")?;

        let completed = successful + failed;
        if completed % LOGGING_INTERVAL == 0 {
            log_progress(start_time, completed, total);
        }
    }
    output.flush().await.context("Failed to flush output")?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    log::info!(
        "Batch finished: {} scored, {} failed in {:.2}s",
        successful,
        failed,
        elapsed_seconds
    );
    stats.log_summary();

    Ok(BatchReport {
        total_uris: total,
        successful,
        failed,
        elapsed_seconds,
    })
}

/// Reads URIs one per line from a file, or stdin for `-`. Blank lines and `#` comments are skipped.
async fn read_uris(file: &std::path::Path) -> Result<Vec<String>> {
    let mut uris = Vec::new();
    if file.as_os_str() == "-" {
        log::info!("Reading URIs from stdin");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            push_uri(&mut uris, &line);
        }
    } else {
        let handle = tokio::fs::File::open(file)
            .await
            .with_context(|| format!("Failed to open input file {}", file.display()))?;
        let mut lines = BufReader::new(handle).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?
        {
            push_uri(&mut uris, &line);
        }
    }
    Ok(uris)
}

fn push_uri(uris: &mut Vec<String>, line: &str) {
    let trimmed = line.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('#') {
        uris.push(trimmed.to_string());
    }
}
