//! Display functions for command results

use super::formatters::{columns, seconds};
use crate::batch::{BatchReport, ExitCause};
use crate::commands::SolveResult;
use colored::Colorize;
use std::time::Duration;

const LINE_WIDTH: usize = 72;

/// Print the answers to one puzzle
pub fn print_solve_result(result: &SolveResult, verbose: bool) {
    println!("\n{}", "─".repeat(LINE_WIDTH).cyan());
    println!(
        "Puzzle: {} {}",
        result.puzzle.required().to_ascii_uppercase().to_string().bright_yellow().bold(),
        result.puzzle.others().to_uppercase()
    );
    println!("{}", "─".repeat(LINE_WIDTH).cyan());

    if verbose {
        println!("  Searched {} dictionary words", result.dictionary_size);
    }

    for line in columns(&result.matches, LINE_WIDTH) {
        println!("  {line}");
    }

    println!();
    println!(
        "{} {}",
        format!("{} words", result.matches.len()).green().bold(),
        if result.pangrams.is_empty() {
            String::new()
        } else {
            format!("(pangrams: {})", result.pangrams.join(", "))
                .bright_yellow()
                .to_string()
        }
    );
}

/// Print how every worker in a batch ended
pub fn print_batch_report(report: &BatchReport) {
    println!("\n{}", "═".repeat(LINE_WIDTH).cyan());
    println!(" {} ", "BATCH RESULTS".bright_cyan().bold());
    println!("{}", "═".repeat(LINE_WIDTH).cyan());

    println!("  Pangrams analyzed: {}", report.pangrams);
    println!("  Worker processes:  {}", report.workers.len());
    println!();

    for worker in &report.workers {
        let cause = worker.cause().to_string();
        let cause = match worker.cause() {
            ExitCause::Completed => cause.green(),
            ExitCause::IoError | ExitCause::Failed(_) => cause.red(),
            ExitCause::Killed(_) | ExitCause::Unknown => cause.yellow(),
        };
        println!(
            "  pid {:>7}: exit_code={} signal={} {}",
            worker.pid,
            worker.code.unwrap_or(0),
            worker.signal.unwrap_or(0),
            cause
        );
    }

    println!("\n  Batch time: {}s", seconds(report.elapsed));
}

/// Final line of every run
pub fn print_elapsed(elapsed: Duration) {
    println!("Elapsed time: {} seconds.", seconds(elapsed));
}
