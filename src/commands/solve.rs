//! Single puzzle command
//!
//! Finds every dictionary word that answers one puzzle.

use crate::core::{Puzzle, Word};
use rayon::prelude::*;

/// Result of solving one puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    pub puzzle: Puzzle,
    /// Accepted words, sorted
    pub matches: Vec<String>,
    /// Accepted words that use all seven letters
    pub pangrams: Vec<String>,
    pub dictionary_size: usize,
}

/// Solve one puzzle against the dictionary
///
/// Matching runs in parallel over the dictionary; the result is sorted, so it
/// is the same on every run.
#[must_use]
pub fn solve_puzzle(puzzle: &Puzzle, dictionary: &[Word]) -> SolveResult {
    let mut found: Vec<&Word> = dictionary.par_iter().filter(|w| puzzle.accepts(w)).collect();
    found.sort_unstable();

    let pangrams = found
        .iter()
        .filter(|w| w.letters() == puzzle.alphabet())
        .map(|w| w.text().to_string())
        .collect();

    SolveResult {
        puzzle: *puzzle,
        matches: found.iter().map(|w| w.text().to_string()).collect(),
        pangrams,
        dictionary_size: dictionary.len(),
    }
}
