//! Batch orchestration
//!
//! Fans a dictionary's pangrams out to worker processes and reaps them. Each
//! worker is the current executable relaunched with `--worker`; its chunk is
//! written to its stdin and nothing else is shared with it. The parent keeps
//! only the child handles, keyed by pid, and records how each one ended.

use super::partition::{PartitionError, split};
use super::worker::{WorkerContext, finish, interrupt_flag};
use super::BatchConfig;
use crate::core::{Pangram, Word};
use crate::exit_code;
use crate::sink::AnySink;
use crate::wordlists::find_pangrams;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{self, Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Pause between polls while no child has exited yet
const REAP_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("cannot locate worker executable: {0}")]
    Program(#[source] io::Error),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error("failed to start worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to wait for worker: {0}")]
    Reap(#[source] io::Error),
}

/// How a worker ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCause {
    Completed,
    IoError,
    Failed(i32),
    Killed(i32),
    Unknown,
}

impl fmt::Display for ExitCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::IoError => write!(f, "I/O error (exit {})", exit_code::EX_IOERR),
            Self::Failed(code) => write!(f, "failed ({})", exit_code::describe(*code)),
            Self::Killed(signal) => write!(f, "killed by signal {signal}"),
            Self::Unknown => write!(f, "unknown termination"),
        }
    }
}

/// Exit record of one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    pub pid: u32,
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl WorkerExit {
    #[must_use]
    pub fn from_status(pid: u32, status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            pid,
            code: status.code(),
            signal,
        }
    }

    #[must_use]
    pub const fn cause(&self) -> ExitCause {
        match (self.code, self.signal) {
            (Some(exit_code::EX_OK), _) => ExitCause::Completed,
            (Some(exit_code::EX_IOERR), _) => ExitCause::IoError,
            (Some(code), _) => ExitCause::Failed(code),
            (None, Some(signal)) => ExitCause::Killed(signal),
            (None, None) => ExitCause::Unknown,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.cause(), ExitCause::Completed)
    }
}

/// Outcome of a whole batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub pangrams: usize,
    /// One entry per worker, in the order they exited
    pub workers: Vec<WorkerExit>,
    pub elapsed: Duration,
}

impl BatchReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.workers.iter().all(WorkerExit::is_success)
    }
}

/// The batch orchestrator
pub struct Beehive {
    config: BatchConfig,
    program: PathBuf,
}

impl Beehive {
    /// Orchestrator that relaunches the running executable as its workers
    ///
    /// # Errors
    /// Returns `OrchestratorError::Program` if the current executable cannot be found.
    pub fn new(config: BatchConfig) -> Result<Self, OrchestratorError> {
        let program = std::env::current_exe().map_err(OrchestratorError::Program)?;
        Ok(Self::with_program(config, program))
    }

    /// Orchestrator that launches `program --worker ...` for each chunk
    #[must_use]
    pub const fn with_program(config: BatchConfig, program: PathBuf) -> Self {
        Self { config, program }
    }

    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Analyze every pangram in `dictionary`
    ///
    /// With one worker the work runs in this process. Otherwise one child per
    /// chunk is started and all of them are reaped before returning, whatever
    /// their individual outcome. A child's failure is reported, not raised.
    ///
    /// # Errors
    ///
    /// Returns `OrchestratorError` only when orchestration itself fails: zero
    /// workers requested, a child could not be started, or a child could not be
    /// waited for. Children already started are still reaped first.
    pub fn run(&self, dictionary: &[Word]) -> Result<BatchReport, OrchestratorError> {
        let start = Instant::now();
        let workers = self.config.workers;
        info!("Using {workers} processes.");

        let pangrams = find_pangrams(dictionary);
        debug!("The dictionary contains {} pangrams", pangrams.len());

        let exits = if workers == 1 {
            vec![self.run_inline(&pangrams, dictionary)]
        } else {
            self.run_children(&pangrams)?
        };

        Ok(BatchReport {
            pangrams: pangrams.len(),
            workers: exits,
            elapsed: start.elapsed(),
        })
    }

    /// Run the single chunk here, stopping between pangrams on SIGINT like a worker would
    fn run_inline(&self, pangrams: &[Pangram], dictionary: &[Word]) -> WorkerExit {
        let progress = if self.config.verbose {
            let pb = ProgressBar::new(pangrams.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pangrams ({percent}%)")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let sink = AnySink::open(self.config.database.as_deref());
        let ctx = WorkerContext::new(sink)
            .with_cancel(interrupt_flag())
            .with_progress(progress);
        let code = finish(ctx, pangrams, dictionary);

        WorkerExit {
            pid: process::id(),
            code: Some(code),
            signal: None,
        }
    }

    fn run_children(&self, pangrams: &[Pangram]) -> Result<Vec<WorkerExit>, OrchestratorError> {
        let chunks = split(pangrams, self.config.workers)?;

        let mut pending: FxHashMap<u32, Child> = FxHashMap::default();
        let mut spawn_error = None;
        for chunk in chunks {
            match self.spawn_worker(chunk) {
                Ok(child) => {
                    debug!("started worker {} with {} pangrams", child.id(), chunk.len());
                    pending.insert(child.id(), child);
                }
                Err(e) => {
                    error!("could not start worker: {e}");
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        let (exits, reap_error) = reap(&mut pending);

        if let Some(e) = spawn_error {
            return Err(OrchestratorError::Spawn(e));
        }
        if let Some(e) = reap_error {
            return Err(OrchestratorError::Reap(e));
        }
        Ok(exits)
    }

    fn spawn_worker(&self, chunk: &[Pangram]) -> io::Result<Child> {
        let mut child = Command::new(&self.program)
            .args(self.worker_args())
            .stdin(Stdio::piped())
            .spawn()?;

        let mut payload = String::with_capacity(chunk.len() * 8);
        for pangram in chunk {
            payload.push_str(&pangram.canonical());
            payload.push('\n');
        }

        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(payload.as_bytes()),
            None => Err(io::Error::other("worker stdin was not captured")),
        };

        if let Err(e) = sent {
            // The child cannot get its work; do not leave it running
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
        Ok(child)
    }

    fn worker_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--worker".into(),
            "--dict".into(),
            self.config.dictionary.clone().into_os_string(),
        ];
        if let Some(db) = &self.config.database {
            args.push("--db".into());
            args.push(db.clone().into_os_string());
        }
        if self.config.filter.exclude_s {
            args.push("--no-plurals".into());
        }
        if self.config.verbose {
            args.push("--verbose".into());
        }
        args
    }
}

/// Wait for every pending child, handling whichever exits first
///
/// Returns the exits in completion order, plus the last wait error if any
/// child could not be observed.
fn reap(pending: &mut FxHashMap<u32, Child>) -> (Vec<WorkerExit>, Option<io::Error>) {
    let mut exits = Vec::with_capacity(pending.len());
    let mut reap_error = None;

    while !pending.is_empty() {
        let finished = pending
            .iter_mut()
            .find_map(|(&pid, child)| match child.try_wait() {
                Ok(None) => None,
                Ok(Some(status)) => Some((pid, Ok(status))),
                Err(e) => Some((pid, Err(e))),
            });

        match finished {
            Some((pid, Ok(status))) => {
                pending.remove(&pid);
                let exit = WorkerExit::from_status(pid, status);
                info!(
                    "child pid={pid} has completed with exit_code={} by signal_number={}",
                    exit.code.unwrap_or(0),
                    exit.signal.unwrap_or(0)
                );
                exits.push(exit);
            }
            Some((pid, Err(e))) => {
                pending.remove(&pid);
                error!("could not wait for child {pid}: {e}");
                reap_error = Some(e);
            }
            None => thread::sleep(REAP_INTERVAL),
        }
    }

    (exits, reap_error)
}
