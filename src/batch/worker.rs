//! Pangram analysis worker
//!
//! A worker owns one chunk of pangrams. For each pangram it tries all seven
//! rotations against the full dictionary and hands the answers to its sink,
//! wrapping the seven records in one transaction.

use super::BatchConfig;
use crate::core::{Pangram, Word};
use crate::exit_code;
use crate::sink::{AnySink, ResultRecord, ResultSink, SinkError};
use crate::wordlists::load_from_file;
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use std::io::{self, Read};
use std::process;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Everything a worker needs, handed over explicitly when it starts
pub struct WorkerContext<S: ResultSink> {
    pub pid: u32,
    pub sink: S,
    /// Set by the interrupt handler; checked between pangrams
    pub cancel: Arc<AtomicBool>,
    pub progress: ProgressBar,
}

impl<S: ResultSink> WorkerContext<S> {
    /// Context for the current process with a hidden progress bar
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            pid: process::id(),
            sink,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: ProgressBar::hidden(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// What one worker got through
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub pid: u32,
    /// Pangrams whose transaction was committed
    pub pangrams: usize,
    pub records: usize,
    pub failed_writes: usize,
    pub interrupted: bool,
}

/// Failures that end a worker early
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("{pid}: could not start transaction for {pangram}: {source}")]
    Begin {
        pid: u32,
        pangram: String,
        #[source]
        source: SinkError,
    },
    #[error("{pid}: exception in commit for {pangram}: {source}")]
    Commit {
        pid: u32,
        pangram: String,
        #[source]
        source: SinkError,
    },
}

impl WorkerError {
    /// Process exit status for this failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Begin { .. } | Self::Commit { .. } => exit_code::EX_IOERR,
        }
    }
}

/// The seven records for one pangram, one per rotation in canonical order
#[must_use]
pub fn pangram_records(pangram: &Pangram, dictionary: &[Word], pid: u32) -> Vec<ResultRecord> {
    let canonical = pangram.canonical();
    pangram
        .rotations()
        .map(|puzzle| {
            let matches = puzzle.matches(dictionary);
            let record = ResultRecord::new(puzzle.required(), canonical.clone(), &matches, pid);
            debug!(
                "{pid}: {} {} -> {} words",
                record.middle_letter,
                record.pangram,
                record.matches.len()
            );
            record
        })
        .collect()
}

/// Analyze every pangram in `chunk` against `dictionary`
///
/// Pangrams are processed in chunk order and rotations in canonical letter
/// order. All seven records of a pangram are computed before its transaction
/// begins, so the exclusive lock is only held for the inserts. A failed record
/// write is logged and skipped; a failed begin or commit stops the worker.
/// Cancellation is honoured between pangrams, so a transaction is never left
/// half-written by an interrupt.
///
/// # Errors
///
/// Returns `WorkerError` if the sink cannot begin or commit a transaction.
pub fn analyze<S: ResultSink>(
    ctx: &WorkerContext<S>,
    chunk: &[Pangram],
    dictionary: &[Word],
) -> Result<WorkerSummary, WorkerError> {
    let pid = ctx.pid;
    let mut summary = WorkerSummary {
        pid,
        ..WorkerSummary::default()
    };

    info!("Child process {pid} is analyzing {} pangrams.", chunk.len());

    for pangram in chunk {
        if ctx.cancelled() {
            info!("{pid}: interrupted after {} pangrams", summary.pangrams);
            summary.interrupted = true;
            break;
        }

        let records = pangram_records(pangram, dictionary, pid);
        let canonical = pangram.canonical();

        ctx.sink.begin().map_err(|source| WorkerError::Begin {
            pid,
            pangram: canonical.clone(),
            source,
        })?;

        for record in &records {
            match ctx.sink.write(record) {
                Ok(()) => summary.records += 1,
                Err(e) => {
                    error!(
                        "{pid}: exception writing to db. {e} letter={} pangram={} matches={}",
                        record.middle_letter,
                        record.pangram,
                        record.joined_matches()
                    );
                    summary.failed_writes += 1;
                }
            }
        }

        ctx.sink.commit().map_err(|source| WorkerError::Commit {
            pid,
            pangram: canonical,
            source,
        })?;

        summary.pangrams += 1;
        ctx.progress.inc(1);
    }

    ctx.progress.finish_and_clear();
    Ok(summary)
}

/// Read a chunk sent by the orchestrator: one pangram per line
///
/// Lines that are not seven distinct letters are skipped with a warning.
#[must_use]
pub fn parse_chunk(payload: &str) -> Vec<Pangram> {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let pangram = Pangram::parse(line);
            if pangram.is_none() {
                warn!("ignoring malformed pangram '{line}'");
            }
            pangram
        })
        .collect()
}

/// Entry point of a worker process
///
/// Reads its chunk from stdin, reloads the dictionary, analyzes, closes the
/// sink and then exits the process directly. Never returns to the caller.
pub fn run_worker_process(config: &BatchConfig) -> ! {
    let code = worker_main(config);
    process::exit(code)
}

/// Flag raised by SIGINT for the rest of this process's life
///
/// The handler is installed on first use; later calls share the same flag.
pub fn interrupt_flag() -> Arc<AtomicBool> {
    static FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();
    let flag = FLAG.get_or_init(|| {
        let flag = Arc::new(AtomicBool::new(false));
        let raised = Arc::clone(&flag);
        if let Err(e) = ctrlc::set_handler(move || raised.store(true, Ordering::SeqCst)) {
            warn!("{}: interrupt handler unavailable: {e}", process::id());
        }
        flag
    });
    Arc::clone(flag)
}

fn worker_main(config: &BatchConfig) -> i32 {
    let cancel = interrupt_flag();

    let mut payload = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut payload) {
        error!("{}: could not read work chunk: {e}", process::id());
        return exit_code::EX_IOERR;
    }
    let chunk = parse_chunk(&payload);

    let dictionary = match load_from_file(&config.dictionary, config.filter) {
        Ok(words) => words,
        Err(e) => {
            error!("{}: {} cannot be read: {e}", process::id(), config.dictionary.display());
            return exit_code::EX_NOINPUT;
        }
    };

    let ctx = WorkerContext::new(AnySink::open(config.database.as_deref())).with_cancel(cancel);

    finish(ctx, &chunk, &dictionary)
}

/// Run `analyze`, then always close the sink before reporting a status
pub(crate) fn finish<S: ResultSink>(
    ctx: WorkerContext<S>,
    chunk: &[Pangram],
    dictionary: &[Word],
) -> i32 {
    let result = analyze(&ctx, chunk, dictionary);

    let pid = ctx.pid;
    if let Err(e) = ctx.sink.close() {
        warn!("{pid}: {e}");
    }

    match result {
        Ok(summary) => {
            debug!(
                "{pid}: {} pangrams, {} records, {} failed writes",
                summary.pangrams, summary.records, summary.failed_writes
            );
            exit_code::EX_OK
        }
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}
