//! Progress logging for batch runs.

use std::time::Instant;

/// Logs how many URIs are done and the running rate.
///
/// # Arguments
///
/// * `start_time` - When the batch started
/// * `completed` - URIs finished so far (successful or not)
/// * `total` - URIs in the batch
pub fn log_progress(start_time: Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    log::info!(
        "Scored {}/{} mementos in {:.2} seconds (~{:.2} mementos/sec)",
        completed,
        total,
        elapsed_secs,
        rate
    );
}
