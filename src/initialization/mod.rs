//! Process-wide setup for the binary and the batch runner.
//!
//! This module provides:
//! - Logger initialization (plain coloured or JSON lines)
//! - The semaphore bounding concurrent computations

mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// # Arguments
///
/// * `count` - Maximum number of mementos scored at once
///
/// # Returns
///
/// An `Arc<Semaphore>` shared by every batch task. A count of 0 is raised to 1.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}
