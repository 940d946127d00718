//! Per-URI task processing.
//!
//! This module contains the logic for scoring a single memento inside a batch,
//! including success/failure/timeout handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Semaphore;

use crate::damage::DamageReport;
use crate::error_handling::{categorize_error, ErrorType, InfoType, ProcessingStats};
use crate::utils::sanitize::sanitize_and_truncate_error_message;

use super::{compute_memento, MementoRequest};

/// One line of batch output.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub uri: String,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Wall-clock seconds spent scoring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<DamageReport>,
}

impl BatchOutcome {
    fn success(uri: String, elapsed: f64, report: DamageReport) -> Self {
        BatchOutcome {
            uri,
            error: false,
            message: None,
            calculation_time: Some(elapsed),
            result: Some(report),
        }
    }

    fn failure(uri: String, message: &str) -> Self {
        BatchOutcome {
            uri,
            error: true,
            message: Some(sanitize_and_truncate_error_message(message)),
            calculation_time: None,
            result: None,
        }
    }
}

/// Everything a URI task needs.
pub struct UriTaskParams {
    pub request: MementoRequest,
    pub semaphore: Arc<Semaphore>,
    pub timeout: Duration,
    pub stats: Arc<ProcessingStats>,
}

/// Scores one memento on the blocking pool.
///
/// The semaphore permit moves into the blocking job, so a computation that outlives
/// its timeout still counts against the concurrency limit until it really ends.
///
/// # Arguments
///
/// * `params` - All parameters needed to score the URI
pub async fn process_uri_task(params: UriTaskParams) -> BatchOutcome {
    let UriTaskParams {
        request,
        semaphore,
        timeout,
        stats,
    } = params;
    let uri = request.uri.clone();

    let permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            stats.increment_error(ErrorType::ComputationFailed);
            return BatchOutcome::failure(uri, &e.to_string());
        }
    };

    let start = Instant::now();
    let job = tokio::task::spawn_blocking(move || {
        let _permit = permit; // Hold permit until the computation ends
        compute_memento(&request)
    });

    match tokio::time::timeout(timeout, job).await {
        Ok(Ok(Ok(report))) => handle_success(uri, start, report, &stats),
        Ok(Ok(Err(e))) => {
            let error_type = categorize_error(&e);
            stats.increment_error(error_type);
            log::warn!("Failed to score {} ({}): {:#}", uri, error_type, e);
            BatchOutcome::failure(uri, &format!("{:#}", e))
        }
        Ok(Err(join_err)) => {
            stats.increment_error(ErrorType::ComputationFailed);
            log::error!("Computation for {} panicked: {}", uri, join_err);
            BatchOutcome::failure(uri, &join_err.to_string())
        }
        Err(_) => {
            stats.increment_error(ErrorType::ComputationTimeout);
            log::warn!(
                "Scoring {} timed out after {} seconds",
                uri,
                timeout.as_secs()
            );
            BatchOutcome::failure(
                uri,
                &format!("Computation timed out after {} seconds", timeout.as_secs()),
            )
        }
    }
}

/// Records per-memento counters and wraps the report.
fn handle_success(
    uri: String,
    start: Instant,
    report: DamageReport,
    stats: &ProcessingStats,
) -> BatchOutcome {
    let diagnostics = report.diagnostics;
    stats.add_info(InfoType::BlacklistedResource, diagnostics.blacklisted);
    stats.add_info(InfoType::RedirectCollapsed, diagnostics.redirects_collapsed);
    stats.add_info(InfoType::RedirectLoop, diagnostics.redirect_loops);
    for issue in &report.errors {
        stats.increment_error(issue.error);
    }

    let elapsed = start.elapsed().as_secs_f64();
    log::debug!("Scored {} in {:.2}s", uri, elapsed);
    BatchOutcome::success(uri, elapsed, report)
}
