//! All-pangram batch mode
//!
//! The [`Beehive`] finds every pangram in the dictionary, splits them into one
//! contiguous chunk per worker and runs each chunk in its own process.

mod orchestrator;
pub mod partition;
pub mod worker;

pub use orchestrator::{BatchReport, Beehive, ExitCause, OrchestratorError, WorkerExit};
pub use partition::{PartitionError, split};
pub use worker::{
    WorkerContext, WorkerError, WorkerSummary, analyze, interrupt_flag, pangram_records,
    run_worker_process,
};

use crate::wordlists::DictionaryFilter;
use std::path::PathBuf;

/// What a batch run, and each of its workers, is configured with
///
/// Worker processes are launched with the same dictionary path, filter and
/// database so they rebuild identical state from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub dictionary: PathBuf,
    pub filter: DictionaryFilter,
    pub database: Option<PathBuf>,
    pub workers: usize,
    pub verbose: bool,
}
