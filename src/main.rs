//! Spelling Bee Solver - CLI
//!
//! Solves one NYTimes Spelling Bee puzzle, or every puzzle that can be built from
//! the pangrams in a dictionary using a pool of worker processes.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use spelling_bee::{
    batch::{BatchConfig, OrchestratorError, run_worker_process},
    commands::{run_batch, solve_puzzle},
    core::Puzzle,
    exit_code,
    logging::init_logger,
    output::{print_batch_report, print_elapsed, print_solve_result},
    wordlists::{DictionaryFilter, build_dictionary, default_word_list, load_from_file},
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "bee",
    about = "What bee does, bee does best: solves the NYTimes Spelling Bee",
    version
)]
struct Cli {
    /// Find all the pangrams in the dictionary, and test all the rotations of each one
    #[arg(short, long)]
    batch: bool,

    /// Number of worker processes in batch mode, one per core
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    cpus: u16,

    /// Dictionary file (default: the system word list)
    #[arg(short, long)]
    dict: Option<PathBuf>,

    /// Existing SQLite database to which batch results are written
    #[arg(long)]
    db: Option<PathBuf>,

    /// Seven letters with the required letter first, or six letters with --middle
    #[arg(short, long)]
    letters: Option<String>,

    /// Required (middle) letter
    #[arg(short, long)]
    middle: Option<String>,

    /// Be chatty about what is taking place
    #[arg(short, long)]
    verbose: bool,

    /// Drop every dictionary word containing 's' (no plurals)
    #[arg(long)]
    no_plurals: bool,

    /// Write the filtered dictionary to <name>.bee in the current directory and exit
    #[arg(long)]
    build_dict: bool,

    /// Run as a batch worker, reading pangrams from stdin
    #[arg(long, hide = true)]
    worker: bool,
}

impl Cli {
    fn filter(&self) -> DictionaryFilter {
        DictionaryFilter {
            exclude_s: self.no_plurals,
            ..DictionaryFilter::default()
        }
    }

    fn dictionary(&self) -> PathBuf {
        self.dict.clone().unwrap_or_else(default_word_list)
    }

    fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            dictionary: self.dictionary(),
            filter: self.filter(),
            database: self.db.clone(),
            workers: usize::from(self.cpus),
            verbose: self.verbose,
        }
    }
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if cli.worker {
        run_worker_process(&cli.batch_config());
    }

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            if e.downcast_ref::<OrchestratorError>().is_some() {
                exit_code::EX_OSERR
            } else {
                exit_code::EX_SOFTWARE
            }
        }
    };

    print_elapsed(start.elapsed());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn run(cli: &Cli) -> Result<i32> {
    let dictionary = cli.dictionary();

    if cli.build_dict {
        return Ok(build_command(&dictionary, cli.filter()));
    }

    // Validate the puzzle before doing any work
    let puzzle = if cli.batch {
        None
    } else {
        let Some(letters) = cli.letters.as_deref() else {
            eprintln!("You must supply the --letters argument; 7 letters with the required letter first.");
            eprintln!("Use -h to get help.");
            return Ok(exit_code::EX_DATAERR);
        };
        match Puzzle::from_letters(letters, cli.middle.as_deref()) {
            Ok(puzzle) => Some(puzzle),
            Err(e) => {
                error!("{e}");
                return Ok(exit_code::EX_DATAERR);
            }
        }
    };

    let words = match load_from_file(&dictionary, cli.filter())
        .with_context(|| format!("{} cannot be read", dictionary.display()))
    {
        Ok(words) => words,
        Err(e) => {
            error!("{e:#}");
            return Ok(exit_code::EX_NOINPUT);
        }
    };
    debug!("Spelling Bee for {} words.", words.len());

    match puzzle {
        Some(puzzle) => {
            let result = solve_puzzle(&puzzle, &words);
            print_solve_result(&result, cli.verbose);
        }
        None => {
            let report = run_batch(cli.batch_config(), &words).context("batch run failed")?;
            print_batch_report(&report);
        }
    }

    Ok(exit_code::EX_OK)
}

fn build_command(source: &Path, filter: DictionaryFilter) -> i32 {
    match build_dictionary(source, filter, Path::new(".")) {
        Ok((target, count)) => {
            info!("Wrote {count} words to {}", target.display());
            exit_code::EX_OK
        }
        Err(e) => {
            error!("cannot build dictionary from {}: {e}", source.display());
            exit_code::EX_NOINPUT
        }
    }
}
