//! memento_damage library: damage scoring for archived web pages
//!
//! A memento is a page captured by a web archive. This library compares what the
//! crawler logged while rendering the memento (every HTTP exchange, the layout of
//! images and multimedia, the importance of each stylesheet) with screenshots of
//! the page, and scores how much of it was lost. Damage is reported per channel
//! (image, css, multimedia, text) both as *potential* (everything that could be
//! lost) and *actual* (what failed to load), and as their ratio.
//!
//! # Example
//!
//! ```no_run
//! use memento_damage::{compute_memento, MementoRequest};
//!
//! # fn main() -> anyhow::Result<()> {
//! let request = MementoRequest::new("http://example.com/", "./cache");
//! let report = compute_memento(&request)?;
//! println!("total damage: {:.3}", report.total_damage);
//! # Ok(())
//! # }
//! ```
//!
//! The engine itself is synchronous; [`run_batch`] requires a Tokio runtime.

pub mod cache;
pub mod config;
pub mod coverage;
pub mod damage;
pub mod error_handling;
pub mod filter;
pub mod geometry;
pub mod initialization;
pub mod logs;
pub mod raster;
pub mod redirect;
pub mod run;
pub mod text;
mod utils;

// Re-export public API
pub use config::{
    BackgroundColor, BatchArgs, Cli, Command, ComputeArgs, DamageConfig, LogFormat, LogLevel,
    ScoringWeights,
};
pub use damage::{DamageEngine, DamageInputs, DamageReport};
pub use error_handling::{DamageError, RecordIssue};
pub use run::{compute_memento, run_batch, BatchOutcome, BatchReport, MementoRequest};
pub use utils::hash_uri;
